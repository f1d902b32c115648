//! Line tokenization.
//!
//! Splits a raw input line into whitespace-delimited tokens. Escapes and
//! quotes are resolved here, exactly once; nothing downstream unescapes
//! again.
//!
//! Grammar:
//! - `\` before whitespace keeps that whitespace in the token, `\\` is a
//!   literal backslash, `\"` and `\'` literal quotes. A backslash before
//!   any other character is kept.
//! - `"..."` groups text and honors `\"` and `\\` inside. `'...'` groups
//!   text literally. Quoted segments join adjacent unquoted text.

use crate::error::ParseError;

/// A single token from an input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineToken {
    value: String,
    offset: usize,
    quote_start: Option<usize>,
}

impl LineToken {
    /// Creates a token. A quoted token is treated as quoted from its
    /// first character. Mostly useful in tests.
    #[must_use]
    pub fn new(value: impl Into<String>, offset: usize, quoted: bool) -> Self {
        Self {
            value: value.into(),
            offset,
            quote_start: quoted.then_some(0),
        }
    }

    /// The unescaped text of the token.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Byte offset of the token's first character in the line.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Whether any part of the token was quoted.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quote_start.is_some()
    }

    /// Byte offset into [`value`](Self::value) where the first quoted
    /// segment starts.
    #[must_use]
    pub const fn quote_start(&self) -> Option<usize> {
        self.quote_start
    }

    /// The leading part of the value that was typed outside quotes.
    ///
    /// Only this part can make a token read as an option, so
    /// `--msg="a b"` is an option and `"--msg"` is a word.
    #[must_use]
    pub fn unquoted_prefix(&self) -> &str {
        match self.quote_start {
            Some(start) => &self.value[..start],
            None => &self.value,
        }
    }
}

/// A tokenized line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedLine {
    tokens: Vec<LineToken>,
    ends_with_space: bool,
    unterminated_quote: Option<usize>,
}

impl ParsedLine {
    /// The tokens, in order.
    #[must_use]
    pub fn tokens(&self) -> &[LineToken] {
        &self.tokens
    }

    /// Whether the line ends with unescaped whitespace.
    #[must_use]
    pub const fn ends_with_space(&self) -> bool {
        self.ends_with_space
    }

    /// Byte offset of a quote that was never closed, if any.
    #[must_use]
    pub const fn unterminated_quote(&self) -> Option<usize> {
        self.unterminated_quote
    }

    /// Returns true if the line has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Creates an iterator positioned at the first token.
    #[must_use]
    pub fn iter(&self) -> TokenIterator<'_> {
        TokenIterator::new(&self.tokens)
    }
}

/// Tokenizes command lines.
pub struct LineTokenizer;

impl LineTokenizer {
    /// Tokenizes a line, failing on an unterminated quote.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnterminatedQuote`] if a quote is never closed.
    pub fn tokenize(line: &str) -> Result<ParsedLine, ParseError> {
        let parsed = Self::tokenize_lenient(line);
        match parsed.unterminated_quote {
            Some(position) => Err(ParseError::UnterminatedQuote { position }),
            None => Ok(parsed),
        }
    }

    /// Tokenizes a line, closing any open quote at end of input.
    ///
    /// Used for completion, where the line is usually incomplete.
    #[must_use]
    pub fn tokenize_lenient(line: &str) -> ParsedLine {
        let mut tokens = Vec::new();
        let mut chars = line.char_indices().peekable();
        let mut current = String::new();
        let mut start: Option<usize> = None;
        let mut quote_start: Option<usize> = None;
        let mut unterminated_quote = None;
        let mut ends_with_space = false;

        while let Some((idx, ch)) = chars.next() {
            ends_with_space = false;
            match ch {
                '\\' => {
                    start.get_or_insert(idx);
                    match chars.peek() {
                        Some(&(_, next))
                            if next.is_whitespace() || matches!(next, '\\' | '"' | '\'') =>
                        {
                            current.push(next);
                            chars.next();
                        }
                        _ => current.push('\\'),
                    }
                }
                '"' | '\'' => {
                    start.get_or_insert(idx);
                    quote_start.get_or_insert(current.len());
                    let mut closed = false;
                    while let Some((_, c)) = chars.next() {
                        if c == ch {
                            closed = true;
                            break;
                        }
                        if ch == '"' && c == '\\' {
                            if let Some(&(_, next @ ('"' | '\\'))) = chars.peek() {
                                current.push(next);
                                chars.next();
                                continue;
                            }
                        }
                        current.push(c);
                    }
                    if !closed {
                        unterminated_quote = Some(idx);
                    }
                }
                c if c.is_whitespace() => {
                    if let Some(offset) = start.take() {
                        tokens.push(LineToken {
                            value: std::mem::take(&mut current),
                            offset,
                            quote_start: quote_start.take(),
                        });
                    }
                    ends_with_space = true;
                }
                c => {
                    start.get_or_insert(idx);
                    current.push(c);
                }
            }
        }

        if let Some(offset) = start {
            tokens.push(LineToken {
                value: current,
                offset,
                quote_start,
            });
        }

        ParsedLine {
            tokens,
            ends_with_space,
            unterminated_quote,
        }
    }

    /// Escapes whitespace, backslashes, and quotes so the result tokenizes
    /// back to `word` as a single token.
    #[must_use]
    pub fn escape(word: &str) -> String {
        let mut escaped = String::with_capacity(word.len());
        for c in word.chars() {
            if c.is_whitespace() || matches!(c, '\\' | '"' | '\'') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

/// A resumable cursor over a line's tokens.
///
/// A parent parser hands the same iterator to a child parser, so the child
/// continues exactly where the parent stopped.
#[derive(Clone, Debug)]
pub struct TokenIterator<'a> {
    tokens: &'a [LineToken],
    position: usize,
}

impl<'a> TokenIterator<'a> {
    /// Creates an iterator over the given tokens.
    #[must_use]
    pub const fn new(tokens: &'a [LineToken]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Returns the next token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'a LineToken> {
        self.tokens.get(self.position)
    }

    /// Returns true if tokens remain.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Index of the next token to be consumed.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for TokenIterator<'a> {
    type Item = &'a LineToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }
}
