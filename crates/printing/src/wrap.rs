use crate::metrics::FontMetrics;

/// Greedy word wrap against `max_width` points.
///
/// Words are split on whitespace and re-joined with single spaces. A word wider
/// than `max_width` is placed alone on its own line and never broken. Blank
/// input yields no lines.
pub fn wrap_text<M>(text: &str, max_width: f32, font_size_pt: f32, metrics: &M) -> Vec<String>
where
    M: FontMetrics + ?Sized,
{
    let space = metrics.text_width(" ", font_size_pt);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0f32;

    for word in text.split_whitespace() {
        let word_width = metrics.text_width(word, font_size_pt);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
