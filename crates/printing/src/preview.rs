use std::collections::hash_map::Entry;
use std::collections::HashMap;

use image::{codecs::png::PngEncoder, ColorType, ImageEncoder, Rgba, RgbaImage};

use crate::display::{Color, DisplayCommand, PrintDisplayList, Stroke};
use crate::job::ExportJobId;
use crate::metrics::{FontMetrics, Helvetica};

/// Cache key for preview bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub job_id: ExportJobId,
    pub page: u32,
    pub zoom_percent: u32,
}

/// Stored preview entry (PNG payload).
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
    pub data: Vec<u8>,
}

/// In-memory LRU-ish cache for preview pages.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<PreviewKey, PreviewEntry>,
    order: Vec<PreviewKey>,
    capacity: usize,
}

impl PreviewCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            capacity,
        }
    }

    pub fn insert(&mut self, key: PreviewKey, entry: PreviewEntry) {
        if self.capacity == 0 {
            return;
        }
        let exists = self.entries.contains_key(&key);
        if !exists && self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.first().copied() {
                self.entries.remove(&oldest);
                self.order.remove(0);
            }
        }

        match self.entries.entry(key) {
            Entry::Occupied(mut occ) => {
                occ.insert(entry);
                self.touch(key);
            }
            Entry::Vacant(vac) => {
                vac.insert(entry);
                self.order.push(key);
            }
        }
    }

    pub fn get(&mut self, key: &PreviewKey) -> Option<&PreviewEntry> {
        if self.entries.contains_key(key) {
            self.touch(*key);
            self.entries.get(key)
        } else {
            None
        }
    }

    /// Entries of one export, ordered by page then zoom.
    pub fn job_entries(&self, job_id: ExportJobId) -> Vec<(PreviewKey, &PreviewEntry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|(key, _)| key.job_id == job_id)
            .map(|(key, entry)| (*key, entry))
            .collect();
        entries.sort_by_key(|(key, _)| (key.page, key.zoom_percent));
        entries
    }

    pub fn remove_job(&mut self, job_id: ExportJobId) {
        self.entries.retain(|key, _| key.job_id != job_id);
        self.order.retain(|key| key.job_id != job_id);
    }

    fn touch(&mut self, key: PreviewKey) {
        if let Some(idx) = self.order.iter().position(|k| *k == key) {
            let key = self.order.remove(idx);
            self.order.push(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Upper bound on the effective preview resolution, whatever the zoom.
pub const MAX_PREVIEW_DPI: u32 = 300;
const MIN_PREVIEW_DPI: u32 = 18;

/// Effective resolution for `base_dpi` at `zoom_percent`.
pub fn preview_dpi(base_dpi: u32, zoom_percent: u32) -> u32 {
    let scaled = u64::from(base_dpi) * u64::from(zoom_percent) / 100;
    scaled.clamp(u64::from(MIN_PREVIEW_DPI), u64::from(MAX_PREVIEW_DPI)) as u32
}

/// Rasterises a page as a thumbnail: rectangles and rules as drawn, text as
/// solid blocks the width of the run.
pub fn render_preview_png(
    display_list: &PrintDisplayList,
    page_width_pt: f32,
    page_height_pt: f32,
    zoom_percent: u32,
    base_dpi: u32,
) -> Result<PreviewEntry, image::ImageError> {
    let dpi = preview_dpi(base_dpi, zoom_percent);
    let mut canvas = Canvas::new(page_width_pt, page_height_pt, dpi as f32 / 72.0);
    let metrics = Helvetica;

    for command in &display_list.commands {
        match command {
            DisplayCommand::BackgroundRect(rect) => canvas.fill(
                rect.origin.x,
                rect.origin.y,
                rect.size.width,
                rect.size.height,
                rect.color,
            ),
            DisplayCommand::GlyphRun(run) => {
                // Ink band of the line box, from x-height to baseline.
                let size = run.font_size_pt;
                let width = metrics.text_width(&run.text, size);
                canvas.fill(
                    run.position.x,
                    run.position.y + size * 0.45,
                    width,
                    size * 0.55,
                    run.color,
                );
            }
            DisplayCommand::HorizontalRule { start, end, stroke } => {
                canvas.rule(start.x, end.x, start.y, stroke)
            }
        }
    }

    let (width_px, height_px) = canvas.image.dimensions();
    let mut data = Vec::new();
    PngEncoder::new(&mut data).write_image(
        canvas.image.as_raw(),
        width_px,
        height_px,
        ColorType::Rgba8,
    )?;

    Ok(PreviewEntry {
        width_px,
        height_px,
        dpi,
        data,
    })
}

/// RGBA bitmap addressed in points.
struct Canvas {
    image: RgbaImage,
    scale: f32,
}

impl Canvas {
    fn new(width_pt: f32, height_pt: f32, scale: f32) -> Self {
        let width_px = (width_pt * scale).ceil().max(1.0) as u32;
        let height_px = (height_pt * scale).ceil().max(1.0) as u32;
        Self {
            image: RgbaImage::from_pixel(width_px, height_px, Rgba([255, 255, 255, 255])),
            scale,
        }
    }

    /// Pixel span covering `[from, from + len)` points, clipped to `limit`.
    fn span(&self, from: f32, len: f32, limit: u32) -> std::ops::Range<u32> {
        let start = (from * self.scale).floor().max(0.0) as u32;
        let end = ((from + len) * self.scale).ceil().max(0.0) as u32;
        start.min(limit)..end.min(limit)
    }

    fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let (width_px, height_px) = self.image.dimensions();
        let columns = self.span(x, width, width_px);
        let rows = self.span(y, height, height_px);
        let pixel = to_rgba(color);
        for row in rows {
            for column in columns.clone() {
                self.image.put_pixel(column, row, pixel);
            }
        }
    }

    /// At least one pixel thick at any scale.
    fn rule(&mut self, x0: f32, x1: f32, y: f32, stroke: &Stroke) {
        let thickness = stroke.width.max(1.0 / self.scale);
        self.fill(
            x0.min(x1),
            y - thickness / 2.0,
            (x1 - x0).abs(),
            thickness,
            stroke.color,
        );
    }
}

fn to_rgba(color: Color) -> Rgba<u8> {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Point, Rectangle, Size};

    fn entry(tag: u8) -> PreviewEntry {
        PreviewEntry {
            width_px: 1,
            height_px: 1,
            dpi: 72,
            data: vec![tag],
        }
    }

    #[test]
    fn evicts_least_recently_used() {
        let job = ExportJobId::new();
        let key = |page| PreviewKey {
            job_id: job,
            page,
            zoom_percent: 100,
        };
        let mut cache = PreviewCache::with_capacity(2);
        cache.insert(key(1), entry(1));
        cache.insert(key(2), entry(2));
        assert!(cache.get(&key(1)).is_some());
        cache.insert(key(3), entry(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(2)).is_none());
        assert_eq!(cache.get(&key(1)).map(|e| e.data[0]), Some(1));

        let pages: Vec<u32> = cache.job_entries(job).iter().map(|(k, _)| k.page).collect();
        assert_eq!(pages, vec![1, 3]);
        cache.remove_job(job);
        assert!(cache.is_empty());
    }

    #[test]
    fn renders_png_at_zoom() {
        let mut list = PrintDisplayList::default();
        list.push(DisplayCommand::BackgroundRect(Rectangle {
            origin: Point { x: 0.0, y: 0.0 },
            size: Size {
                width: 72.0,
                height: 72.0,
            },
            color: Color::new(0.0, 0.0, 1.0, 1.0),
        }));
        let preview = render_preview_png(&list, 144.0, 72.0, 50, 144).unwrap();
        assert_eq!(preview.dpi, 72);
        assert_eq!((preview.width_px, preview.height_px), (144, 72));
        assert!(preview.data.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn effective_dpi_is_capped() {
        assert_eq!(preview_dpi(96, 50), 48);
        assert_eq!(preview_dpi(36, 10), MIN_PREVIEW_DPI);
        assert_eq!(preview_dpi(300, 400), MAX_PREVIEW_DPI);

        let preview =
            render_preview_png(&PrintDisplayList::default(), 72.0, 36.0, 400, 300).unwrap();
        assert_eq!(preview.dpi, MAX_PREVIEW_DPI);
        assert_eq!((preview.width_px, preview.height_px), (300, 150));
    }
}
