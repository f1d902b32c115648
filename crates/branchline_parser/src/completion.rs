//! Read-only completion over a parser tree.
//!
//! The view walks the words before the cursor the same way a parse would,
//! but leniently: unknown words are skipped instead of failing, and an
//! unterminated quote is treated as closed. It never mutates the tree.

use std::sync::Arc;

use crate::option::{OptionArity, OptionDefinition};
use crate::parser::CommandLineParser;
use crate::resolve::{TokenShape, classify, looks_like_option};
use crate::tokenizer::{LineToken, LineTokenizer};

/// Candidates for the word under the cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset where the word being completed starts.
    pub start: usize,
    /// Replacement text for that word, already escaped.
    pub candidates: Vec<String>,
}

/// Where a lenient walk ended up.
struct Position<'p, C> {
    node: &'p CommandLineParser<C>,
    seen: Vec<&'p str>,
    awaiting: Option<&'p OptionDefinition>,
    routing_open: bool,
}

/// A completion view rooted at one parser.
pub struct CompletionView<'p, C> {
    root: &'p CommandLineParser<C>,
}

impl<'p, C> CompletionView<'p, C> {
    /// Creates a view over `root`.
    #[must_use]
    pub const fn new(root: &'p CommandLineParser<C>) -> Self {
        Self { root }
    }

    /// The parser this view is rooted at.
    #[must_use]
    pub const fn root(&self) -> &'p CommandLineParser<C> {
        self.root
    }

    /// The most specific node reached by the complete words before
    /// `cursor`. Falls back to the root.
    #[must_use]
    pub fn resolved_leaf(&self, line: &str, cursor: usize) -> &'p CommandLineParser<C> {
        let (words, _, _) = split_at_cursor(line, cursor);
        self.walk(&words).map_or(self.root, |p| p.node)
    }

    /// The options that apply at `cursor`, in declaration order.
    #[must_use]
    pub fn options_at(&self, line: &str, cursor: usize) -> &'p [Arc<OptionDefinition>] {
        self.resolved_leaf(line, cursor).definition().options()
    }

    /// Computes candidates for the word under `cursor`.
    #[must_use]
    pub fn complete(&self, line: &str, cursor: usize) -> Completion {
        let (words, prefix, start) = split_at_cursor(line, cursor);

        let candidates = if words.is_empty() {
            filter(self.root.all_names(), &prefix)
        } else {
            match self.walk(&words) {
                Some(position) => Self::candidates(&position, &prefix),
                None => Vec::new(),
            }
        };

        Completion { start, candidates }
    }

    fn candidates(position: &Position<'p, C>, prefix: &str) -> Vec<String> {
        if let Some(option) = position.awaiting {
            if !prefix.starts_with('-') {
                return filter(
                    option.defaults().iter().map(|d| LineTokenizer::escape(d)),
                    prefix,
                );
            }
        }

        if prefix.starts_with('-') {
            let options = position
                .node
                .definition()
                .options()
                .iter()
                .filter(|o| {
                    matches!(o.arity(), OptionArity::List | OptionArity::Properties)
                        || !position.seen.contains(&o.name())
                })
                .map(|o| o.long_form());
            return filter(options, prefix);
        }

        if position.routing_open {
            let names = position
                .node
                .children()
                .iter()
                .flat_map(CommandLineParser::all_names);
            return filter(names, prefix);
        }

        Vec::new()
    }

    fn walk(&self, words: &[LineToken]) -> Option<Position<'p, C>> {
        let (first, rest) = words.split_first()?;
        if !self.root.definition().matches(first.value()) {
            return None;
        }

        let mut position = Position {
            node: self.root,
            seen: Vec::new(),
            awaiting: None,
            routing_open: is_routing(self.root),
        };

        for word in rest {
            if position.awaiting.take().is_some() && !looks_like_option(word) {
                continue;
            }

            if position.routing_open && !looks_like_option(word) {
                if let Some(child) = position.node.child_parser(word.value()) {
                    position.node = child;
                    position.seen.clear();
                    position.routing_open = is_routing(child);
                    continue;
                }
            }
            position.routing_open = false;

            let node = position.node;
            let definition = node.definition();
            let (option, inline) = match classify(word) {
                Ok(TokenShape::Long { name, inline }) => {
                    (definition.find_long(name), inline.is_some())
                }
                Ok(TokenShape::Short { cluster }) => {
                    let mut chars = cluster.chars();
                    let option = chars.next().and_then(|c| definition.find_short(c));
                    (option, !chars.as_str().is_empty())
                }
                _ => continue,
            };
            if let Some(option) = option {
                position.seen.push(option.name());
                if option.arity().takes_value() && !inline {
                    position.awaiting = Some(&**option);
                }
            }
        }

        Some(position)
    }
}

fn is_routing<C>(node: &CommandLineParser<C>) -> bool {
    node.is_group_command() && !node.children().is_empty()
}

fn filter(names: impl IntoIterator<Item = String>, prefix: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if name.starts_with(prefix) && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Splits a line into the complete words before `cursor`, the partial
/// word under it, and the byte offset where that partial word starts.
fn split_at_cursor(line: &str, cursor: usize) -> (Vec<LineToken>, String, usize) {
    let mut cursor = cursor.min(line.len());
    while !line.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let parsed = LineTokenizer::tokenize_lenient(&line[..cursor]);
    let mut words = parsed.tokens().to_vec();
    if parsed.ends_with_space() || words.is_empty() {
        return (words, String::new(), cursor);
    }
    match words.pop() {
        Some(current) => {
            let start = current.offset();
            (words, current.value().to_string(), start)
        }
        None => (words, String::new(), cursor),
    }
}
