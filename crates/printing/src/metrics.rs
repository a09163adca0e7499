/// Glyph advance widths used for wrapping and alignment.
/// 換行與對齊時使用的字寬量測介面。
pub trait FontMetrics {
    /// Advance width of `ch` in 1/1000 em.
    fn char_units(&self, ch: char) -> u16;

    /// Width of `text` in points at `font_size_pt`.
    fn text_width(&self, text: &str, font_size_pt: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| u32::from(self.char_units(ch))).sum();
        units as f32 * font_size_pt / 1000.0
    }
}

/// Advance widths of the standard Helvetica face (AFM, WinAnsi subset).
#[derive(Debug, Clone, Copy, Default)]
pub struct Helvetica;

const FALLBACK_UNITS: u16 = 556;

// ' ' (0x20) through '~' (0x7E).
#[rustfmt::skip]
const ASCII_UNITS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

impl FontMetrics for Helvetica {
    fn char_units(&self, ch: char) -> u16 {
        match ch {
            ' '..='~' => ASCII_UNITS[ch as usize - 0x20],
            '•' => 350,
            '°' => 400,
            // Written as "->" by the PDF encoder.
            '→' => 917,
            '\u{2019}' | '\u{2018}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{00BD}' | '\u{00BC}' | '\u{00BE}' => 834,
            _ => FALLBACK_UNITS,
        }
    }
}

/// Every character has the same advance. Handy for predictable layouts in tests.
#[derive(Debug, Clone, Copy)]
pub struct Monospace {
    pub units: u16,
}

impl FontMetrics for Monospace {
    fn char_units(&self, _ch: char) -> u16 {
        self.units
    }
}
