use std::fmt::Write as _;

use thiserror::Error;

/// Tokens recognised by the header/footer parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken {
    /// `&t`
    Title,
    /// `&y`
    PieType,
    /// `&p`
    PageNumber,
    /// `&P`
    PageCount,
}

impl TemplateToken {
    fn from_code(code: char) -> Option<Self> {
        match code {
            't' | 'T' => Some(TemplateToken::Title),
            'y' | 'Y' => Some(TemplateToken::PieType),
            'p' => Some(TemplateToken::PageNumber),
            'P' => Some(TemplateToken::PageCount),
            _ => None,
        }
    }

    fn append_to(&self, buffer: &mut String, context: &HeaderFooterContext<'_>) {
        match self {
            TemplateToken::Title => {
                if let Some(value) = context.title {
                    buffer.push_str(value);
                }
            }
            TemplateToken::PieType => {
                if let Some(value) = context.pie_type {
                    buffer.push_str(value);
                }
            }
            TemplateToken::PageNumber => {
                let _ = write!(buffer, "{}", context.page_number);
            }
            TemplateToken::PageCount => {
                if let Some(total) = context.page_count {
                    let _ = write!(buffer, "{total}");
                }
            }
        }
    }
}

/// Template segments per alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Literal(String),
    Token(TemplateToken),
}

/// Parsed footer line with left, center and right slots.
///
/// Syntax: `&l`, `&c`, `&r` switch the slot, `&t`/`&y`/`&p`/`&P` insert the
/// title, pie type, page number and page count, `&&` is a literal ampersand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderFooterTemplate {
    pub left: Vec<TemplateSegment>,
    pub center: Vec<TemplateSegment>,
    pub right: Vec<TemplateSegment>,
}

#[derive(Clone, Copy)]
enum Alignment {
    Left,
    Center,
    Right,
}

impl HeaderFooterTemplate {
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut template = Self::default();
        let mut alignment = Alignment::Left;
        let mut buffer = String::new();

        let mut chars = input.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '&' {
                buffer.push(ch);
                continue;
            }

            let Some(code) = chars.next() else {
                buffer.push('&');
                break;
            };

            let next_alignment = match code {
                '&' => {
                    buffer.push('&');
                    continue;
                }
                'l' | 'L' => Some(Alignment::Left),
                'c' | 'C' => Some(Alignment::Center),
                'r' | 'R' => Some(Alignment::Right),
                _ => None,
            };

            template.flush(&mut buffer, alignment);
            match next_alignment {
                Some(next) => alignment = next,
                None => {
                    let token =
                        TemplateToken::from_code(code).ok_or(TemplateError::UnknownToken(code))?;
                    template.push(TemplateSegment::Token(token), alignment);
                }
            }
        }

        template.flush(&mut buffer, alignment);
        Ok(template)
    }

    /// Centered fixed text, e.g. the site name printed on every page.
    pub fn branding(text: &str) -> Self {
        let mut template = Self::default();
        if !text.is_empty() {
            template.push(TemplateSegment::Literal(text.to_string()), Alignment::Center);
        }
        template
    }

    /// Right-aligned `Page i of N`.
    pub fn page_indicator() -> Self {
        Self {
            right: vec![
                TemplateSegment::Literal("Page ".into()),
                TemplateSegment::Token(TemplateToken::PageNumber),
                TemplateSegment::Literal(" of ".into()),
                TemplateSegment::Token(TemplateToken::PageCount),
            ],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.center.is_empty() && self.right.is_empty()
    }

    pub fn render(&self, context: &HeaderFooterContext<'_>) -> RenderedHeaderFooter {
        RenderedHeaderFooter {
            left: render_segments(&self.left, context),
            center: render_segments(&self.center, context),
            right: render_segments(&self.right, context),
        }
    }

    fn flush(&mut self, buffer: &mut String, alignment: Alignment) {
        if buffer.is_empty() {
            return;
        }
        self.push(TemplateSegment::Literal(std::mem::take(buffer)), alignment);
    }

    fn push(&mut self, segment: TemplateSegment, alignment: Alignment) {
        match alignment {
            Alignment::Left => self.left.push(segment),
            Alignment::Center => self.center.push(segment),
            Alignment::Right => self.right.push(segment),
        }
    }
}

fn render_segments(segments: &[TemplateSegment], context: &HeaderFooterContext<'_>) -> String {
    let mut output = String::new();
    for segment in segments {
        match segment {
            TemplateSegment::Literal(text) => output.push_str(text),
            TemplateSegment::Token(token) => token.append_to(&mut output, context),
        }
    }
    output
}

/// Runtime context for footer rendering.
#[derive(Debug, Clone, Default)]
pub struct HeaderFooterContext<'a> {
    pub title: Option<&'a str>,
    pub pie_type: Option<&'a str>,
    pub page_number: u32,
    pub page_count: Option<u32>,
}

/// Rendered strings for each alignment slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeaderFooter {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// Errors raised while parsing footer templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown footer token '&{0}'")]
    UnknownToken(char),
}
