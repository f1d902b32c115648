//! Syntax highlighting for command lines.
//!
//! Words are colored by role:
//! - the first word: green if it names a registered command, red if not
//! - option words (`-x`, `--name`): cyan
//! - quoted words: yellow
//! - escaped characters: bold

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

use branchline_parser::LineTokenizer;

use crate::registry::CommandRegistry;
use crate::terminal::{Color, TerminalString, TextStyle, render_line};

/// Colors the words of a line against a registry.
pub struct CommandHighlighter {
    registry: Arc<CommandRegistry>,
}

impl CommandHighlighter {
    /// Creates a highlighter for `registry`.
    #[must_use]
    pub const fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Highlights a line. Returns it unchanged if nothing needs styling.
    #[must_use]
    pub fn highlight<'l>(&self, line: &'l str) -> Cow<'l, str> {
        let segments = segments(line);
        if segments.iter().all(|s| s.whitespace) {
            return Cow::Borrowed(line);
        }

        let mut parts = Vec::with_capacity(segments.len());
        let mut first_word = true;
        for segment in segments {
            let text = &line[segment.range.clone()];
            if segment.whitespace {
                parts.push(TerminalString::new(text));
                continue;
            }
            parts.push(self.style_word(text, first_word));
            first_word = false;
        }

        Cow::Owned(render_line(&parts, true))
    }

    fn style_word(&self, raw: &str, first: bool) -> TerminalString {
        if first {
            let word = LineTokenizer::tokenize_lenient(raw)
                .tokens()
                .first()
                .map(|t| t.value().to_string())
                .unwrap_or_default();
            let color = if self.registry.get(&word).is_some() {
                Color::Green
            } else {
                Color::Red
            };
            return TerminalString::colored(raw, color).with_style(TextStyle::new().bold());
        }

        if raw.starts_with('"') || raw.starts_with('\'') {
            TerminalString::colored(raw, Color::Yellow)
        } else if raw.starts_with('-') && raw.len() > 1 {
            TerminalString::colored(raw, Color::Cyan)
        } else if raw.contains('\\') {
            TerminalString::new(raw).with_style(TextStyle::new().bold())
        } else {
            TerminalString::new(raw)
        }
    }
}

struct Segment {
    range: Range<usize>,
    whitespace: bool,
}

/// Splits a raw line into alternating word and whitespace runs, honoring
/// quotes and backslash escapes the way the tokenizer does.
fn segments(line: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut chars = line.char_indices().peekable();
    let mut start = 0;
    let mut in_word = false;
    let mut quote: Option<char> = None;

    while let Some((idx, c)) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else if q == '"' && c == '\\' {
                chars.next_if(|&(_, next)| next == '"' || next == '\\');
            }
            continue;
        }

        let space = c.is_whitespace();
        if space == in_word && idx > 0 {
            out.push(Segment {
                range: start..idx,
                whitespace: !in_word,
            });
            start = idx;
        }
        in_word = !space;

        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some(c),
            _ => {}
        }
    }

    if start < line.len() {
        out.push(Segment {
            range: start..line.len(),
            whitespace: !in_word,
        });
    }
    out
}
