//! Recipe document pipeline: layout, pagination, footers, PDF and previews.

pub mod controller;
pub mod cursor;
pub mod display;
pub mod engine;
pub mod job;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod preview;
pub mod sink;
pub mod style;
pub mod template;
pub mod wrap;

pub use controller::{
    export_recipe, preview_file_name, render_page_previews, ExportError, ExportResult,
    PreviewConfig, PDF_MEDIA_TYPE, PNG_MEDIA_TYPE,
};
pub use cursor::{LayoutCursor, Placement};
pub use display::{DisplayCommand, GlyphRun, PrintDisplayList, TextRole};
pub use engine::RecipeLayoutEngine;
pub use job::{
    mm_to_pt, ContentArea, ExportJobId, ExportOptions, ExportState, Margin, Orientation, PaperId,
    PaperSize,
};
pub use layout::{LayoutSummary, PageLayout, Paginator, RecipeLayout};
pub use metrics::{FontMetrics, Helvetica};
pub use pdf::{encode_win_ansi, render_pdf, PdfError};
pub use preview::{
    preview_dpi, render_preview_png, PreviewCache, PreviewEntry, PreviewKey, MAX_PREVIEW_DPI,
};
pub use sink::{Artifact, ArtifactSink, DiscardSink, FileSink, MemorySink, SinkError};
pub use style::{select_tier, ContentVolume, FontTier, TextStyle};
pub use template::{
    HeaderFooterContext, HeaderFooterTemplate, RenderedHeaderFooter, TemplateError,
    TemplateSegment, TemplateToken,
};
pub use wrap::wrap_text;
