use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::template::HeaderFooterTemplate;

/// Opaque identifier for one export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportJobId(u64);

impl ExportJobId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ExportJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExportJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export-{}", self.0)
    }
}

/// Orientation of a print page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Margin values expressed in points (1/72").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margin {
    pub const fn zero() -> Self {
        Self {
            top: 0.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
        }
    }

    pub fn from_mm(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top: mm_to_pt(top),
            bottom: mm_to_pt(bottom),
            left: mm_to_pt(left),
            right: mm_to_pt(right),
        }
    }
}

/// Supported paper identifiers for quick selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperId {
    A4,
    Letter,
    Custom,
}

/// Represents a paper size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub id: PaperId,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PaperSize {
    pub const A4: PaperSize = PaperSize::new(PaperId::A4, 210.0, 297.0);
    pub const LETTER: PaperSize = PaperSize::new(PaperId::Letter, 215.9, 279.4);

    pub const fn new(id: PaperId, width_mm: f32, height_mm: f32) -> Self {
        Self {
            id,
            width_mm,
            height_mm,
        }
    }

    pub fn to_points(&self, orientation: Orientation) -> (f32, f32) {
        let width_pt = mm_to_pt(self.width_mm);
        let height_pt = mm_to_pt(self.height_mm);
        match orientation {
            Orientation::Portrait => (width_pt, height_pt),
            Orientation::Landscape => (height_pt, width_pt),
        }
    }
}

/// Clearance between the card edge and the text area.
const CARD_PADDING_PT: f32 = 6.0;
/// Clearance between the last body line and the footer.
const FOOTER_GAP_PT: f32 = 6.0;

pub fn mm_to_pt(mm: f32) -> f32 {
    const MM_PER_INCH: f32 = 25.4;
    mm / MM_PER_INCH * 72.0
}

/// The rectangle text may occupy on every page, in points from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContentArea {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Page geometry and decoration for one export. Constant for the whole call.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub job_id: ExportJobId,
    pub paper: PaperSize,
    pub orientation: Orientation,
    /// Distance from the paper edge to the text area.
    pub margins: Margin,
    /// Inset of the light card drawn over the dark page background.
    pub frame_inset: f32,
    /// Distance from the bottom paper edge to the footer baseline.
    pub footer_offset: f32,
    pub footer_font_size: f32,
    pub font_family: String,
    /// Rendered on every page.
    pub footer_template: Arc<HeaderFooterTemplate>,
    /// Rendered on every page, but only when the document has more than one page.
    pub page_indicator_template: Arc<HeaderFooterTemplate>,
}

impl ExportOptions {
    pub fn new(
        paper: PaperSize,
        orientation: Orientation,
        margins: Margin,
        footer_template: HeaderFooterTemplate,
        page_indicator_template: HeaderFooterTemplate,
    ) -> Self {
        Self {
            job_id: ExportJobId::new(),
            paper,
            orientation,
            margins,
            frame_inset: mm_to_pt(15.0),
            footer_offset: mm_to_pt(20.0),
            footer_font_size: 10.0,
            font_family: "Helvetica".to_string(),
            footer_template: Arc::new(footer_template),
            page_indicator_template: Arc::new(page_indicator_template),
        }
    }

    pub fn page_size(&self) -> (f32, f32) {
        self.paper.to_points(self.orientation)
    }

    /// Text area after the margins, never narrower than the card or closer
    /// to the bottom edge than the footer band.
    pub fn content_area(&self) -> ContentArea {
        let (width, height) = self.page_size();
        let card_edge = self.frame_inset + CARD_PADDING_PT;
        let left = self.margins.left.max(card_edge);
        let right = self.margins.right.max(card_edge);
        let top = self.margins.top.max(card_edge);
        let bottom = self
            .margins
            .bottom
            .max(self.footer_band_height() + FOOTER_GAP_PT)
            .max(card_edge);
        ContentArea {
            left,
            top,
            width: (width - left - right).max(1.0),
            height: (height - top - bottom).max(1.0),
        }
    }

    /// Distance from the bottom paper edge to the top of the footer line.
    pub fn footer_band_height(&self) -> f32 {
        self.footer_offset + self.footer_font_size
    }

    /// Same geometry under a fresh export id.
    pub fn with_new_job_id(&self) -> Self {
        Self {
            job_id: ExportJobId::new(),
            ..self.clone()
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(
            PaperSize::A4,
            Orientation::Portrait,
            Margin::from_mm(30.0, 35.0, 25.0, 25.0),
            HeaderFooterTemplate::branding("WizardTim.com"),
            HeaderFooterTemplate::page_indicator(),
        )
    }
}

/// Controller state markers for logging and UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Layout,
    Render,
    Delivering,
    Completed,
    Failed,
}
