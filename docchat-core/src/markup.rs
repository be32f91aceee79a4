//! HTML handling for chat content, on top of `html2text`.
//!
//! User questions are untrusted: they are parsed as HTML and only their
//! visible text is kept. Assistant answers arrive as backend-generated HTML
//! (`<strong>`, `<li>`, `<br>`) and are laid out into styled lines for the
//! terminal.

use html2text::render::text_renderer::{RichAnnotation, TaggedLine};

/// Layout width used when only the text matters, not the wrapping.
const UNWRAPPED_WIDTH: usize = 4096;

/// Narrowest layout html2text is asked for.
const MIN_WIDTH: usize = 8;

type RichLine = TaggedLine<Vec<RichAnnotation>>;

fn rich_lines(html: &str, width: usize) -> Result<Vec<RichLine>, html2text::Error> {
    html2text::config::rich().lines_from_read(html.as_bytes(), width)
}

/// Line breaks typed by the user survive HTML whitespace collapsing.
fn breaks_to_html(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

fn trim_blank_edges<T>(lines: &mut Vec<T>, is_blank: impl Fn(&T) -> bool) {
    while lines.last().is_some_and(&is_blank) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| is_blank(line)).count();
    lines.drain(..leading);
}

/// Strip markup from untrusted user input.
///
/// Tags, attributes and image alt text are dropped; script and style
/// elements lose their content. Entities are decoded and typed line breaks
/// are kept.
pub fn sanitize_user_input(input: &str) -> String {
    let lines = match rich_lines(&breaks_to_html(input), UNWRAPPED_WIDTH) {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(error = %e, "Could not parse user input, discarding it");
            return String::new();
        }
    };

    let mut text: Vec<String> = lines
        .iter()
        .map(|line| {
            line.tagged_strings()
                .filter(|piece| {
                    !piece
                        .tag
                        .iter()
                        .any(|a| matches!(a, RichAnnotation::Image(..)))
                })
                .map(|piece| piece.s.as_str())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();
    trim_blank_edges(&mut text, |line| line.is_empty());
    text.join("\n")
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub bold: bool,
}

/// One display line of laid-out markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupLine {
    pub fragments: Vec<Fragment>,
}

impl MarkupLine {
    fn unstyled(text: &str) -> Self {
        Self {
            fragments: vec![Fragment {
                text: text.to_string(),
                bold: false,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.text.trim().is_empty())
    }

    /// Unstyled text of the line
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

impl From<&RichLine> for MarkupLine {
    fn from(line: &RichLine) -> Self {
        let mut fragments: Vec<Fragment> = Vec::new();
        for piece in line.tagged_strings() {
            let bold = piece.tag.iter().any(|a| matches!(a, RichAnnotation::Strong));
            match fragments.last_mut() {
                Some(last) if last.bold == bold => last.text.push_str(&piece.s),
                _ => fragments.push(Fragment {
                    text: piece.s.clone(),
                    bold,
                }),
            }
        }
        Self { fragments }
    }
}

/// Lay out backend answer HTML into lines at most `width` columns wide.
///
/// Bold comes from `<strong>`/`<b>`; list items carry their bullet and a
/// hanging indent on continuation lines.
pub fn render_html(content: &str, width: usize) -> Vec<MarkupLine> {
    let width = width.max(MIN_WIDTH);
    let mut lines: Vec<MarkupLine> = match rich_lines(content, width) {
        Ok(lines) => lines.iter().map(MarkupLine::from).collect(),
        Err(e) => {
            tracing::warn!(error = %e, width, "Could not lay out answer, showing it unformatted");
            content.lines().map(MarkupLine::unstyled).collect()
        }
    };
    trim_blank_edges(&mut lines, MarkupLine::is_empty);
    lines
}

/// Lay out plain text (a stored user question) at `width` columns.
pub fn render_text(content: &str, width: usize) -> Vec<MarkupLine> {
    let escaped = content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    render_html(&breaks_to_html(&escaped), width)
}

/// Answer HTML as plain text for terminal output.
pub fn plain_text(content: &str, width: usize) -> String {
    html2text::from_read(content.as_bytes(), width.max(MIN_WIDTH))
        .trim_end()
        .to_string()
}
