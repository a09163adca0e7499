use std::fmt::Write as _;

use thiserror::Error;

use crate::display::{Color, DisplayCommand, PrintDisplayList};
use crate::layout::PageLayout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PdfError {
    #[error("layout produced no pages")]
    NoPages,
}

/// Serialises laid-out pages into a PDF 1.4 document using the built-in
/// Helvetica face.
/// 將排版後的頁面輸出為 PDF 1.4 文件。
pub fn render_pdf(
    pages: &[PageLayout],
    page_width: f32,
    page_height: f32,
) -> Result<Vec<u8>, PdfError> {
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let mut builder = PdfBuilder::new();
    let catalog = builder.reserve();
    let pages_object = builder.reserve();
    let font_object = builder.add_object(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = render_page_stream(&page.display_list, page_height);
        let content_object = builder.add_stream(&content);
        let page_object = builder.add_object(
            format!(
                "<< /Type /Page /Parent {pages_object} 0 R /MediaBox [0 0 {width} {height}] \
                 /Resources << /Font << /F1 {font_object} 0 R >> >> /Contents {content_object} 0 R >>",
                width = fmt_float(page_width),
                height = fmt_float(page_height),
            )
            .into_bytes(),
        );
        kids.push(format!("{page_object} 0 R"));
    }

    builder.fill(
        pages_object,
        format!(
            "<< /Type /Pages /Count {count} /Kids [{kids}] >>",
            count = pages.len(),
            kids = kids.join(" ")
        )
        .into_bytes(),
    );
    builder.fill(
        catalog,
        format!("<< /Type /Catalog /Pages {pages_object} 0 R >>").into_bytes(),
    );

    Ok(builder.finish(catalog))
}

fn render_page_stream(display_list: &PrintDisplayList, page_height: f32) -> Vec<u8> {
    let mut stream = Vec::new();
    for command in &display_list.commands {
        match command {
            DisplayCommand::GlyphRun(run) => {
                // Line boxes are top-left anchored; PDF text is placed by baseline.
                let x = fmt_float(run.position.x);
                let y = fmt_float(page_height - run.position.y - run.font_size_pt);
                let size = fmt_float(run.font_size_pt);
                push_str(
                    &mut stream,
                    &format!(
                        "{color} rg\nBT\n/F1 {size} Tf\n1 0 0 1 {x} {y} Tm\n(",
                        color = rgb_to_pdf(run.color)
                    ),
                );
                stream.extend(escape_literal(&encode_win_ansi(&run.text)));
                push_str(&mut stream, ") Tj\nET\n");
            }
            DisplayCommand::BackgroundRect(rect) => {
                push_str(
                    &mut stream,
                    &format!(
                        "{color} rg\n{x} {y} {w} {h} re f\n",
                        color = rgb_to_pdf(rect.color),
                        x = fmt_float(rect.origin.x),
                        y = fmt_float(page_height - rect.origin.y - rect.size.height),
                        w = fmt_float(rect.size.width),
                        h = fmt_float(rect.size.height),
                    ),
                );
            }
            DisplayCommand::HorizontalRule { start, end, stroke } => {
                let y = fmt_float(page_height - start.y);
                push_str(
                    &mut stream,
                    &format!(
                        "{color} RG\n{width} w\n{x0} {y} m {x1} {y} l S\n",
                        color = rgb_to_pdf(stroke.color),
                        width = fmt_float(stroke.width),
                        x0 = fmt_float(start.x),
                        x1 = fmt_float(end.x),
                    ),
                );
            }
        }
    }
    stream
}

/// Maps text onto the WinAnsi code page used by the standard fonts.
///
/// `→` becomes `->`; anything else without a WinAnsi code becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = match ch {
            '\t' | '\n' | '\r' => b' ',
            ' '..='~' => ch as u8,
            '\u{00A0}'..='\u{00FF}' => ch as u32 as u8,
            '→' => {
                bytes.extend_from_slice(b"->");
                continue;
            }
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        };
        bytes.push(code);
    }
    bytes
}

fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        if matches!(byte, b'(' | b')' | b'\\') {
            output.push(b'\\');
        }
        output.push(byte);
    }
    output
}

fn push_str(buffer: &mut Vec<u8>, text: &str) {
    buffer.extend_from_slice(text.as_bytes());
}

fn fmt_float(value: f32) -> String {
    format!("{:.3}", value)
}

fn rgb_to_pdf(color: Color) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0)
    )
}

/// Object table with numbers handed out up front, so objects can reference
/// each other before their bodies exist.
struct PdfBuilder {
    objects: Vec<Option<Vec<u8>>>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    fn reserve(&mut self) -> usize {
        self.objects.push(None);
        self.objects.len()
    }

    fn fill(&mut self, number: usize, body: Vec<u8>) {
        if let Some(slot) = self.objects.get_mut(number - 1) {
            *slot = Some(body);
        }
    }

    fn add_object(&mut self, body: Vec<u8>) -> usize {
        self.objects.push(Some(body));
        self.objects.len()
    }

    fn add_stream(&mut self, stream: &[u8]) -> usize {
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"\nendstream");
        self.add_object(body)
    }

    fn finish(self, root: usize) -> Vec<u8> {
        let mut output = Vec::new();
        output.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(output.len());
            push_str(&mut output, &format!("{} 0 obj\n", index + 1));
            match body {
                Some(body) => output.extend_from_slice(body),
                None => output.extend_from_slice(b"null"),
            }
            output.extend_from_slice(b"\nendobj\n");
        }

        let xref_start = output.len();
        let mut xref = String::new();
        let _ = write!(
            xref,
            "xref\n0 {}\n0000000000 65535 f \n",
            self.objects.len() + 1
        );
        for offset in &offsets {
            let _ = writeln!(xref, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.objects.len() + 1,
            root,
            xref_start
        );
        push_str(&mut output, &xref);
        output
    }
}
