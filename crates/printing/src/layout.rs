use piecraft_core::Recipe;

use crate::display::{GlyphRun, PrintDisplayList};
use crate::job::ExportOptions;
use crate::style::FontTier;

/// A single laid-out page.
/// 單一頁面的佈局資訊。
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// One-based.
    pub page_number: u32,
    pub display_list: PrintDisplayList,
}

impl PageLayout {
    pub fn new(page_number: u32, display_list: PrintDisplayList) -> Self {
        Self {
            page_number,
            display_list,
        }
    }
}

/// Decisions taken while laying out a recipe.
/// 排版過程中做出的決策摘要。
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    pub total_pages: u32,
    pub tier: FontTier,
    pub ingredient_columns: u8,
    pub instruction_columns: u8,
    pub substitution_columns: u8,
    /// Zero when the substitutions section was omitted.
    pub substitution_count: usize,
}

/// Pages plus summary.
#[derive(Debug, Clone)]
pub struct RecipeLayout {
    pub pages: Vec<PageLayout>,
    pub summary: LayoutSummary,
}

impl RecipeLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every glyph run, in page order then paint order.
    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.display_list.glyph_runs())
    }
}

/// Contract implemented by the pagination engine.
/// 分頁引擎需實作的介面契約。
pub trait Paginator {
    fn paginate(&self, recipe: &Recipe, options: &ExportOptions) -> RecipeLayout;
}
