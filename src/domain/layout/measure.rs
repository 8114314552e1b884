// src/domain/layout/measure.rs

/// Estimates how tall a piece of text is once wrapped at a given width.
///
/// Implementations must be pure: the same text and width always produce the
/// same height.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, width: f32) -> f32;
}

/// Monospace estimate: every visible character is `char_width` wide and
/// every wrapped line is `line_height` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMeasurer {
    pub char_width: f32,
    pub line_height: f32,
}

impl HeuristicMeasurer {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    pub fn line_count(&self, text: &str, width: f32) -> u32 {
        let per_line = ((width / self.char_width.max(0.1)).floor() as usize).max(1);
        strip_markup(text)
            .split('\n')
            .map(|paragraph| {
                let chars = paragraph.trim_end().chars().count();
                chars.div_ceil(per_line).max(1) as u32
            })
            .sum()
    }
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self::new(5.5, 14.0)
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, width: f32) -> f32 {
        self.line_count(text, width) as f32 * self.line_height
    }
}

/// Drops inline tags, turns `<br>` and block-closing tags into line breaks
/// and collapses common entities to a single character.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                let rest = chars.as_str();
                match rest.find('>') {
                    Some(end) if is_tag(&rest[..end]) => {
                        let tag = &rest[..end];
                        let name = tag
                            .trim_start_matches('/')
                            .split(|c: char| c.is_whitespace() || c == '/')
                            .next()
                            .unwrap_or("")
                            .to_ascii_lowercase();
                        let closing = tag.starts_with('/');
                        if name == "br"
                            || (closing && matches!(name.as_str(), "p" | "div" | "li"))
                        {
                            out.push('\n');
                        }
                        chars = rest[end + 1..].chars();
                    }
                    _ => out.push('<'),
                }
            }
            '&' => {
                let rest = chars.as_str();
                match rest.find(';') {
                    Some(end) if end <= 8 && rest[..end].chars().all(|c| c.is_ascii_alphanumeric() || c == '#') => {
                        out.push('?');
                        chars = rest[end + 1..].chars();
                    }
                    _ => out.push('&'),
                }
            }
            '\r' => {}
            other => out.push(other),
        }
    }
    out.trim_end_matches('\n').to_string()
}

/// Body of a `<...>` run: starts like an element name or closing slash and
/// does not open another bracket.
fn is_tag(body: &str) -> bool {
    body.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/') && !body.contains('<')
}
