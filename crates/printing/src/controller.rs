use log::{debug, info, warn};
use piecraft_core::{slugify, Recipe, RecipeError};
use thiserror::Error;

use crate::display::{DisplayCommand, GlyphRun, Point, PrintDisplayList, TextRole};
use crate::job::{ExportOptions, ExportState};
use crate::layout::{LayoutSummary, PageLayout, Paginator, RecipeLayout};
use crate::metrics::{FontMetrics, Helvetica};
use crate::pdf::{render_pdf, PdfError};
use crate::preview::{render_preview_png, PreviewCache, PreviewEntry, PreviewKey};
use crate::sink::{Artifact, ArtifactSink};
use crate::style::palette;
use crate::template::{HeaderFooterContext, HeaderFooterTemplate};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// Result produced after a successful export.
/// 匯出成功後產生的結果。
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub file_name: String,
    pub summary: LayoutSummary,
    /// Final pages, footers included.
    pub pages: Vec<PageLayout>,
    pub pdf_data: Vec<u8>,
    pub state: ExportState,
}

/// Configuration for preview generation.
/// 建立預覽時所需的設定資訊。
#[derive(Debug)]
pub struct PreviewConfig<'a> {
    pub cache: &'a mut PreviewCache,
    pub zoom_levels: &'a [u32],
    pub base_dpi: u32,
}

/// Errors raised while exporting a recipe. Nothing reaches the sink when one
/// of these is returned, except for `Delivery` itself.
/// 匯出食譜時可能發生的錯誤。
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("recipe cannot be exported: {0}")]
    InvalidRecipe(#[from] RecipeError),
    #[error("preview rendering failed: {0}")]
    Preview(String),
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] PdfError),
    #[error("delivering {file_name} failed: {message}")]
    Delivery { file_name: String, message: String },
}

/// `<slug>_recipe_p<page>.png`
pub fn preview_file_name(recipe: &Recipe, page: u32) -> String {
    format!("{}_recipe_p{page}.png", slugify(&recipe.title))
}

/// Renders one preview per page of a finished export, in page order, at a
/// single zoom level. Unlike [`PreviewConfig`] nothing is cached or evicted.
pub fn render_page_previews(
    pages: &[PageLayout],
    options: &ExportOptions,
    zoom_percent: u32,
    base_dpi: u32,
) -> Result<Vec<(u32, PreviewEntry)>, ExportError> {
    let (page_width, page_height) = options.page_size();
    pages
        .iter()
        .map(|page| {
            render_preview_png(
                &page.display_list,
                page_width,
                page_height,
                zoom_percent,
                base_dpi,
            )
            .map(|entry| (page.page_number, entry))
            .map_err(|err| ExportError::Preview(err.to_string()))
        })
        .collect()
}

/// Lays out, decorates, renders and delivers one recipe document.
/// 對單一食譜執行排版、頁尾、渲染與輸出。
pub fn export_recipe<P, S>(
    paginator: &P,
    recipe: &Recipe,
    options: &ExportOptions,
    sink: &S,
    preview: Option<PreviewConfig<'_>>,
) -> Result<ExportResult, ExportError>
where
    P: Paginator + ?Sized,
    S: ArtifactSink + ?Sized,
    S::Error: std::fmt::Display,
{
    let job = options.job_id;
    let result = run_export(paginator, recipe, options, sink, preview);
    match &result {
        Ok(done) => info!(
            "{job}: exported {} ({} page(s), {:?})",
            done.file_name, done.summary.total_pages, done.summary.tier
        ),
        Err(err) => {
            debug!("{job}: {:?}", ExportState::Failed);
            warn!("{job}: export failed: {err}");
        }
    }
    result
}

fn run_export<P, S>(
    paginator: &P,
    recipe: &Recipe,
    options: &ExportOptions,
    sink: &S,
    preview: Option<PreviewConfig<'_>>,
) -> Result<ExportResult, ExportError>
where
    P: Paginator + ?Sized,
    S: ArtifactSink + ?Sized,
    S::Error: std::fmt::Display,
{
    let job = options.job_id;
    recipe.validate()?;

    debug!("{job}: {:?}", ExportState::Layout);
    let layout = paginator.paginate(recipe, options);
    let summary = layout.summary.clone();
    let pages = append_footers(layout, recipe, options);
    let (page_width, page_height) = options.page_size();

    debug!("{job}: {:?}", ExportState::Render);
    if let Some(preview_config) = preview {
        for page in &pages {
            for &zoom in preview_config.zoom_levels {
                let entry = render_preview_png(
                    &page.display_list,
                    page_width,
                    page_height,
                    zoom,
                    preview_config.base_dpi,
                )
                .map_err(|err| ExportError::Preview(err.to_string()))?;
                let key = PreviewKey {
                    job_id: job,
                    page: page.page_number,
                    zoom_percent: zoom,
                };
                preview_config.cache.insert(key, entry);
            }
        }
    }
    let pdf_data = render_pdf(&pages, page_width, page_height)?;

    debug!("{job}: {:?}", ExportState::Delivering);
    let file_name = recipe.file_name("pdf");
    sink.deliver(&Artifact {
        file_name: &file_name,
        media_type: PDF_MEDIA_TYPE,
        data: &pdf_data,
    })
    .map_err(|err| ExportError::Delivery {
        file_name: file_name.clone(),
        message: err.to_string(),
    })?;

    Ok(ExportResult {
        file_name,
        summary,
        pages,
        pdf_data,
        state: ExportState::Completed,
    })
}

/// Second pass once the page count is known: branding on every page, the
/// page indicator only on multi-page documents.
fn append_footers(
    layout: RecipeLayout,
    recipe: &Recipe,
    options: &ExportOptions,
) -> Vec<PageLayout> {
    let total_pages = layout.pages.len() as u32;
    let mut pages = layout.pages;
    for page in &mut pages {
        let context = HeaderFooterContext {
            title: Some(&recipe.title),
            pie_type: Some(recipe.pie_type.label()),
            page_number: page.page_number,
            page_count: Some(total_pages),
        };
        push_template(&mut page.display_list, &options.footer_template, &context, options);
        if total_pages > 1 {
            push_template(
                &mut page.display_list,
                &options.page_indicator_template,
                &context,
                options,
            );
        }
    }
    pages
}

fn push_template(
    display_list: &mut PrintDisplayList,
    template: &HeaderFooterTemplate,
    context: &HeaderFooterContext<'_>,
    options: &ExportOptions,
) {
    if template.is_empty() {
        return;
    }
    let rendered = template.render(context);
    let area = options.content_area();
    let (page_width, page_height) = options.page_size();
    let size = options.footer_font_size;
    let y = page_height - options.footer_offset - size;
    let metrics = Helvetica;

    let slots = [
        (rendered.left, Slot::Left),
        (rendered.center, Slot::Center),
        (rendered.right, Slot::Right),
    ];
    for (text, slot) in slots {
        if text.is_empty() {
            continue;
        }
        let width = metrics.text_width(&text, size);
        let x = match slot {
            Slot::Left => area.left,
            Slot::Center => (page_width - width) / 2.0,
            Slot::Right => area.right() - width,
        };
        display_list.push(DisplayCommand::GlyphRun(GlyphRun {
            text,
            font_family: options.font_family.clone(),
            font_size_pt: size,
            position: Point { x, y },
            color: palette::PURPLE,
            role: TextRole::Footer,
        }));
    }
}

enum Slot {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RecipeLayoutEngine;
    use crate::sink::{DiscardSink, MemorySink};
    use piecraft_core::{IngredientGroups, PieType};

    fn recipe(instructions: usize) -> Recipe {
        Recipe {
            id: "ctl".into(),
            title: "Moonlit Berry Pie".into(),
            pie_type: PieType::Sweet,
            ingredients: IngredientGroups {
                crust: vec!["2 cups flour".into(), "1 cup magical butter".into()],
                filling: vec!["4 cups enchanted berries".into()],
                topping: None,
            },
            instructions: (0..instructions)
                .map(|n| format!("Step {n}: stir the berries gently until they glow."))
                .collect(),
            baking_time: "40 - 50 minutes".into(),
            baking_temp: "375°F".into(),
            servings: 8,
        }
    }

    fn footers(result: &ExportResult, page: usize) -> Vec<String> {
        result.pages[page]
            .display_list
            .glyph_runs()
            .filter(|run| run.role == TextRole::Footer)
            .map(|run| run.text.clone())
            .collect()
    }

    #[test]
    fn single_page_has_branding_only() {
        let sink = MemorySink::new();
        let result = export_recipe(
            &RecipeLayoutEngine::new(),
            &recipe(3),
            &ExportOptions::default(),
            &sink,
            None,
        )
        .unwrap();
        assert_eq!(result.state, ExportState::Completed);
        assert_eq!(result.file_name, "moonlit_berry_pie_recipe.pdf");
        assert_eq!(footers(&result, 0), vec!["WizardTim.com".to_string()]);

        let delivered = sink.drain();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].media_type, PDF_MEDIA_TYPE);
        assert_eq!(delivered[0].data, result.pdf_data);
    }

    #[test]
    fn multi_page_documents_carry_page_indicator() {
        let result = export_recipe(
            &RecipeLayoutEngine::new(),
            &recipe(90),
            &ExportOptions::default(),
            &DiscardSink,
            None,
        )
        .unwrap();
        let total = result.pages.len();
        assert!(total > 1);
        for page in 0..total {
            assert_eq!(
                footers(&result, page),
                vec![
                    "WizardTim.com".to_string(),
                    format!("Page {} of {}", page + 1, total)
                ]
            );
        }
    }

    #[test]
    fn invalid_recipe_never_reaches_sink() {
        let sink = MemorySink::new();
        let mut broken = recipe(2);
        broken.instructions.clear();
        let err = export_recipe(
            &RecipeLayoutEngine::new(),
            &broken,
            &ExportOptions::default(),
            &sink,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidRecipe(RecipeError::MissingInstructions)
        ));
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn previews_are_cached_per_page_and_zoom() {
        let options = ExportOptions::default();
        let mut cache = PreviewCache::with_capacity(16);
        let result = export_recipe(
            &RecipeLayoutEngine::new(),
            &recipe(3),
            &options,
            &DiscardSink,
            Some(PreviewConfig {
                cache: &mut cache,
                zoom_levels: &[50, 100],
                base_dpi: 72,
            }),
        )
        .unwrap();
        assert_eq!(cache.len(), result.pages.len() * 2);
        let key = PreviewKey {
            job_id: options.job_id,
            page: 1,
            zoom_percent: 100,
        };
        assert_eq!(cache.get(&key).map(|entry| entry.dpi), Some(72));
        assert_eq!(preview_file_name(&recipe(1), 2), "moonlit_berry_pie_recipe_p2.png");
    }

    #[test]
    fn page_previews_cover_every_page_in_order() {
        let options = ExportOptions::default();
        let result = export_recipe(
            &RecipeLayoutEngine::new(),
            &recipe(150),
            &options,
            &DiscardSink,
            None,
        )
        .unwrap();
        assert!(result.pages.len() > 1);

        let previews = render_page_previews(&result.pages, &options, 10, 72).unwrap();
        let pages: Vec<u32> = previews.iter().map(|(page, _)| *page).collect();
        let expected: Vec<u32> = (1..=result.pages.len() as u32).collect();
        assert_eq!(pages, expected);
        assert!(previews
            .iter()
            .all(|(_, entry)| entry.data.starts_with(&[0x89, b'P', b'N', b'G'])));
    }
}
