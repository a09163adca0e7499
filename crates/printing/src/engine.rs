use log::debug;
use piecraft_core::{abbreviate, find_substitutions, Recipe};

use crate::cursor::{LayoutCursor, Placement};
use crate::display::{
    DisplayCommand, GlyphRun, Point, PrintDisplayList, Rectangle, Size, Stroke, TextRole,
};
use crate::job::ExportOptions;
use crate::layout::{LayoutSummary, PageLayout, Paginator, RecipeLayout};
use crate::metrics::{FontMetrics, Helvetica};
use crate::style::{palette, select_tier, ContentVolume, FontTier, TextStyle};
use crate::wrap::wrap_text;

const INGREDIENT_COLUMN_THRESHOLD: usize = 10;
const INSTRUCTION_COLUMN_THRESHOLD: usize = 10;
const SUBSTITUTION_COLUMN_THRESHOLD: usize = 6;
const GUTTER_PT: f32 = 14.0;
const BULLET: &str = "•";
const SUBSTITUTIONS_HEADING: &str = "Real World Substitutions";

/// Lays a recipe out on as few pages as the font tiers allow.
/// 將食譜排版到最少的頁數。
///
/// The starting tier comes from the content volume. While the result spills
/// onto a second page the engine retries at the next smaller tier; at
/// [`FontTier::Dense`] it accepts extra pages instead.
#[derive(Debug, Clone, Default)]
pub struct RecipeLayoutEngine<M = Helvetica> {
    metrics: M,
}

impl RecipeLayoutEngine<Helvetica> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: FontMetrics> RecipeLayoutEngine<M> {
    pub fn with_metrics(metrics: M) -> Self {
        Self { metrics }
    }

    pub fn layout(&self, recipe: &Recipe, options: &ExportOptions) -> RecipeLayout {
        let mut tier = select_tier(ContentVolume::of(recipe));
        loop {
            let layout = self.layout_with_tier(recipe, options, tier);
            if layout.page_count() <= 1 {
                return layout;
            }
            match tier.smaller() {
                Some(next) => {
                    debug!(
                        "{} pages at {:?}, retrying at {:?}",
                        layout.page_count(),
                        tier,
                        next
                    );
                    tier = next;
                }
                None => {
                    debug!("accepting {} pages at {:?}", layout.page_count(), tier);
                    return layout;
                }
            }
        }
    }

    /// Single pass at a fixed tier. Never drops content; extra pages are added
    /// as needed.
    pub fn layout_with_tier(
        &self,
        recipe: &Recipe,
        options: &ExportOptions,
        tier: FontTier,
    ) -> RecipeLayout {
        let mut writer = PageWriter::new(&self.metrics, options, tier);

        writer.title_block(recipe);
        let ingredient_columns = writer.ingredients(recipe);
        let instruction_columns = writer.instructions(recipe);
        let (substitution_count, substitution_columns) = writer.substitutions(recipe);

        let pages: Vec<PageLayout> = writer
            .finish()
            .into_iter()
            .enumerate()
            .map(|(index, display_list)| PageLayout::new(index as u32 + 1, display_list))
            .collect();

        let summary = LayoutSummary {
            total_pages: pages.len() as u32,
            tier,
            ingredient_columns,
            instruction_columns,
            substitution_columns,
            substitution_count,
        };
        debug!("laid out '{}': {:?}", recipe.title, summary);
        RecipeLayout { pages, summary }
    }
}

impl<M: FontMetrics> Paginator for RecipeLayoutEngine<M> {
    fn paginate(&self, recipe: &Recipe, options: &ExportOptions) -> RecipeLayout {
        self.layout(recipe, options)
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

enum IngredientEntry<'a> {
    Subheading(&'static str),
    Item(&'a str),
}

/// Number of columns for a list of `count` entries.
fn columns_for(count: usize, threshold: usize) -> u8 {
    if count > threshold {
        2
    } else {
        1
    }
}

/// Entries that go to the left column: the first `ceil(n/2)`.
fn left_half(count: usize) -> usize {
    (count + 1) / 2
}

struct PageWriter<'a, M: ?Sized> {
    metrics: &'a M,
    options: &'a ExportOptions,
    tier: FontTier,
    cursor: LayoutCursor,
    pages: Vec<PrintDisplayList>,
}

impl<'a, M: FontMetrics + ?Sized> PageWriter<'a, M> {
    fn new(metrics: &'a M, options: &'a ExportOptions, tier: FontTier) -> Self {
        Self {
            metrics,
            options,
            tier,
            cursor: LayoutCursor::new(options.content_area(), GUTTER_PT),
            pages: Vec::new(),
        }
    }

    fn finish(self) -> Vec<PrintDisplayList> {
        self.pages
    }

    fn style(&self, role: TextRole) -> TextStyle {
        self.tier.style(role)
    }

    fn width(&self, text: &str, style: &TextStyle) -> f32 {
        self.metrics.text_width(text, style.size_pt)
    }

    fn wrap(&self, text: &str, width: f32, style: &TextStyle) -> Vec<String> {
        wrap_text(text, width, style.size_pt, self.metrics)
    }

    fn page(&mut self, index: usize) -> &mut PrintDisplayList {
        while self.pages.len() <= index {
            let (width, height) = self.options.page_size();
            let inset = self.options.frame_inset;
            let mut list = PrintDisplayList::default();
            list.push(DisplayCommand::BackgroundRect(Rectangle {
                origin: Point { x: 0.0, y: 0.0 },
                size: Size { width, height },
                color: palette::NAVY,
            }));
            list.push(DisplayCommand::BackgroundRect(Rectangle {
                origin: Point { x: inset, y: inset },
                size: Size {
                    width: (width - 2.0 * inset).max(0.0),
                    height: (height - 2.0 * inset).max(0.0),
                },
                color: palette::PEACH,
            }));
            self.pages.push(list);
        }
        &mut self.pages[index]
    }

    fn run(&mut self, page: usize, x: f32, y: f32, text: &str, style: &TextStyle) {
        let run = GlyphRun {
            text: text.to_string(),
            font_family: self.options.font_family.clone(),
            font_size_pt: style.size_pt,
            position: Point { x, y },
            color: style.color,
            role: style.role,
        };
        self.page(page).push(DisplayCommand::GlyphRun(run));
    }

    /// One line box in the current column.
    fn line(&mut self, text: &str, style: &TextStyle, align: Align) -> Placement {
        let placement = self.cursor.place(style.line_height_pt);
        let x = match align {
            Align::Left => placement.x,
            Align::Center => {
                let slack = (self.cursor.column_width() - self.width(text, style)).max(0.0);
                placement.x + slack / 2.0
            }
        };
        self.run(placement.page, x, placement.y, text, style);
        placement
    }

    /// Wrapped paragraph in the current column.
    fn paragraph(&mut self, text: &str, style: &TextStyle, align: Align) {
        let width = self.cursor.column_width();
        for line in self.wrap(text, width, style) {
            self.line(&line, style, align);
        }
    }

    /// Heading kept on the same column as the first line that follows it.
    fn heading(&mut self, text: &str, style: &TextStyle, next_line_height: f32) {
        self.cursor.ensure(style.line_height_pt + next_line_height);
        self.line(text, style, Align::Left);
    }

    /// `marker` in a fixed-width gutter, `text` wrapped beside it. Only the
    /// first line carries the marker.
    fn marked_entry(&mut self, marker: &str, text: &str, indent: f32, style: &TextStyle) {
        let marker_style = style.with_role(TextRole::Marker);
        let width = (self.cursor.column_width() - indent).max(1.0);
        let lines = self.wrap(text, width, style);
        if lines.is_empty() {
            self.line(marker, &marker_style, Align::Left);
            return;
        }
        for (index, line) in lines.iter().enumerate() {
            let placement = self.cursor.place(style.line_height_pt);
            if index == 0 {
                self.run(placement.page, placement.x, placement.y, marker, &marker_style);
            }
            self.run(placement.page, placement.x + indent, placement.y, line, style);
        }
    }

    fn title_block(&mut self, recipe: &Recipe) {
        let title = self.style(TextRole::Title);
        self.paragraph(&recipe.title, &title, Align::Center);

        let label = self.style(TextRole::TypeLabel);
        self.line(recipe.pie_type.label(), &label, Align::Center);

        let details = self.style(TextRole::Details);
        self.cursor.skip(details.line_height_pt * 0.5);
        let items = [
            format!("Temp: {}", recipe.baking_temp),
            format!("Time: {}", recipe.baking_time),
            format!("Servings: {}", recipe.servings),
        ];
        let third = self.cursor.column_width() / 3.0;
        let split = items
            .iter()
            .all(|item| self.width(item, &details) <= third - 4.0);
        if split {
            let placement = self.cursor.place(details.line_height_pt);
            for (slot, item) in items.iter().enumerate() {
                let slack = (third - self.width(item, &details)).max(0.0);
                let x = placement.x + third * slot as f32 + slack / 2.0;
                self.run(placement.page, x, placement.y, item, &details);
            }
        } else {
            debug!("baking details do not fit three across, stacking");
            for item in &items {
                self.paragraph(item, &details, Align::Center);
            }
        }

        let gap = details.line_height_pt;
        self.cursor.ensure(gap);
        let y = self.cursor.y() + gap / 2.0;
        let x = self.cursor.column_x();
        let width = self.cursor.column_width();
        let page = self.cursor.page();
        self.page(page).push(DisplayCommand::HorizontalRule {
            start: Point { x, y },
            end: Point { x: x + width, y },
            stroke: Stroke {
                width: 0.5,
                color: palette::DIVIDER,
            },
        });
        self.cursor.skip(gap);
    }

    fn ingredients(&mut self, recipe: &Recipe) -> u8 {
        let heading = self.style(TextRole::Heading);
        let subheading = self.style(TextRole::Subheading);
        let body = self.style(TextRole::Body);

        let entries: Vec<IngredientEntry<'_>> = recipe
            .ingredients
            .groups()
            .flat_map(|(section, items)| {
                std::iter::once(IngredientEntry::Subheading(section.heading()))
                    .chain(items.iter().map(|item| IngredientEntry::Item(item.as_str())))
            })
            .collect();
        let count = recipe.ingredients.len();
        let columns = columns_for(count, INGREDIENT_COLUMN_THRESHOLD);

        // The right column starts at the first item past the left half, or at
        // the subheading directly above it.
        let split = if columns == 2 {
            let mut seen = 0usize;
            let mut split = entries.len();
            for (index, entry) in entries.iter().enumerate() {
                if let IngredientEntry::Item(_) = entry {
                    if seen == left_half(count) {
                        split = index;
                        break;
                    }
                    seen += 1;
                }
            }
            if split > 0 && matches!(entries[split - 1], IngredientEntry::Subheading(_)) {
                split - 1
            } else {
                split
            }
        } else {
            entries.len()
        };
        debug!("{count} ingredients in {columns} column(s)");

        self.heading("Ingredients", &heading, subheading.line_height_pt);
        self.cursor.begin_columns(columns);
        let indent = self.width(&format!("{BULLET} "), &body);
        for (index, entry) in entries.iter().enumerate() {
            if index == split {
                self.cursor.start_second_column();
            }
            match entry {
                IngredientEntry::Subheading(text) => {
                    if index != 0 && index != split {
                        self.cursor.skip(body.line_height_pt * 0.3);
                    }
                    self.heading(text, &subheading, body.line_height_pt);
                }
                IngredientEntry::Item(text) => {
                    self.marked_entry(BULLET, &abbreviate(text), indent, &body);
                }
            }
        }
        self.cursor.end_columns();
        self.cursor.skip(body.line_height_pt * 0.6);
        columns
    }

    fn instructions(&mut self, recipe: &Recipe) -> u8 {
        let heading = self.style(TextRole::Heading);
        let body = self.style(TextRole::Body);
        let count = recipe.instructions.len();
        let columns = columns_for(count, INSTRUCTION_COLUMN_THRESHOLD);
        let split = if columns == 2 { left_half(count) } else { count };
        debug!("{count} instructions in {columns} column(s)");

        self.heading("Instructions", &heading, body.line_height_pt);
        self.cursor.begin_columns(columns);
        // Wide enough for the longest step number, and never narrower than two digits.
        let widest = format!("{}. ", count.max(10));
        let prefix = self.width(&widest, &body);
        for (index, step) in recipe.instructions.iter().enumerate() {
            if index == split {
                self.cursor.start_second_column();
            } else if index != 0 {
                self.cursor.skip(body.line_height_pt * 0.25);
            }
            let number = format!("{}.", index + 1);
            self.marked_entry(&number, &abbreviate(step), prefix, &body);
        }
        self.cursor.end_columns();
        columns
    }

    fn substitutions(&mut self, recipe: &Recipe) -> (usize, u8) {
        let found = find_substitutions(recipe.all_ingredients());
        if found.is_empty() {
            return (0, 1);
        }

        let heading = self.style(TextRole::Heading).with_color(palette::PURPLE);
        let body = self.style(TextRole::Body);
        let columns = columns_for(found.len(), SUBSTITUTION_COLUMN_THRESHOLD);
        let split = if columns == 2 {
            left_half(found.len())
        } else {
            found.len()
        };

        self.cursor.skip(body.line_height_pt);
        let minimum = heading.line_height_pt + 2.0 * body.line_height_pt;
        if self.cursor.remaining() < minimum {
            debug!("substitutions start on a new page");
            self.cursor.new_page();
        }
        self.heading(SUBSTITUTIONS_HEADING, &heading, body.line_height_pt);
        self.cursor.begin_columns(columns);
        let indent = self.width(&format!("{BULLET} "), &body);
        for (index, substitution) in found.iter().enumerate() {
            if index == split {
                self.cursor.start_second_column();
            }
            self.marked_entry(BULLET, &substitution.display(), indent, &body);
        }
        self.cursor.end_columns();
        (found.len(), columns)
    }
}
