//! Styled terminal text.
//!
//! A [`TerminalString`] is a run of characters with a text color, a
//! background color and a [`TextStyle`]. Rendering produces ANSI SGR
//! sequences, or the bare characters when color is turned off.

use std::fmt;

const ESC_START: &str = "\x1b[";
const RESET: &str = "\x1b[0m";

/// The eight standard terminal colors plus the terminal default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// Whatever the terminal uses by default.
    #[default]
    Default,
    /// Black.
    Black,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
}

impl Color {
    const fn offset(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::Default => 9,
        }
    }

    /// SGR code for this color as text color.
    #[must_use]
    pub const fn text_code(self) -> u8 {
        30 + self.offset()
    }

    /// SGR code for this color as background color.
    #[must_use]
    pub const fn background_code(self) -> u8 {
        40 + self.offset()
    }
}

/// Text attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct TextStyle {
    bold: bool,
    faint: bool,
    italic: bool,
    underline: bool,
    blink: bool,
    invert: bool,
    crossed_out: bool,
}

impl TextStyle {
    /// No attributes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bold: false,
            faint: false,
            italic: false,
            underline: false,
            blink: false,
            invert: false,
            crossed_out: false,
        }
    }

    /// Bold text.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Faint text.
    #[must_use]
    pub const fn faint(mut self) -> Self {
        self.faint = true;
        self
    }

    /// Italic text.
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Underlined text.
    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Blinking text.
    #[must_use]
    pub const fn blink(mut self) -> Self {
        self.blink = true;
        self
    }

    /// Swapped foreground and background.
    #[must_use]
    pub const fn invert(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Struck-through text.
    #[must_use]
    pub const fn crossed_out(mut self) -> Self {
        self.crossed_out = true;
        self
    }

    /// Whether no attribute is set.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        !(self.bold
            || self.faint
            || self.italic
            || self.underline
            || self.blink
            || self.invert
            || self.crossed_out)
    }

    /// SGR codes for the set attributes, in ascending order.
    #[must_use]
    pub fn codes(&self) -> Vec<u8> {
        [
            (self.bold, 1),
            (self.faint, 2),
            (self.italic, 3),
            (self.underline, 4),
            (self.blink, 5),
            (self.invert, 7),
            (self.crossed_out, 9),
        ]
        .into_iter()
        .filter_map(|(set, code)| set.then_some(code))
        .collect()
    }
}

/// A run of characters and how to display it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TerminalString {
    characters: String,
    text_color: Color,
    background: Color,
    style: TextStyle,
    ignore_rendering: bool,
}

impl TerminalString {
    /// Characters with default colors and no style.
    #[must_use]
    pub fn new(characters: impl Into<String>) -> Self {
        Self {
            characters: characters.into(),
            text_color: Color::Default,
            background: Color::Default,
            style: TextStyle::new(),
            ignore_rendering: false,
        }
    }

    /// Characters that are never wrapped in escape sequences.
    #[must_use]
    pub fn plain(characters: impl Into<String>) -> Self {
        Self {
            ignore_rendering: true,
            ..Self::new(characters)
        }
    }

    /// Characters in the given text color.
    #[must_use]
    pub fn colored(characters: impl Into<String>, color: Color) -> Self {
        Self::new(characters).with_color(color)
    }

    /// Sets the text color.
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Sets the background color.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Sets the text style.
    #[must_use]
    pub const fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// The characters without any styling.
    #[must_use]
    pub fn characters(&self) -> &str {
        &self.characters
    }

    /// The text color.
    #[must_use]
    pub const fn text_color(&self) -> Color {
        self.text_color
    }

    /// The background color.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// The text style.
    #[must_use]
    pub const fn style(&self) -> TextStyle {
        self.style
    }

    /// Whether the characters contain a space after the first position.
    #[must_use]
    pub fn contains_spaces(&self) -> bool {
        self.characters.find(' ').is_some_and(|i| i > 0)
    }

    /// Escapes every space with a backslash, so the text reads back as one
    /// word.
    pub fn escape_spaces(&mut self) {
        self.characters = self.characters.replace(' ', "\\ ");
    }

    /// A copy of this string's rendering attributes around new characters.
    #[must_use]
    pub fn with_characters(&self, characters: impl Into<String>) -> Self {
        Self {
            characters: characters.into(),
            ..self.clone()
        }
    }

    /// Whether `other` renders with the same attributes.
    #[must_use]
    pub fn same_rendering(&self, other: &Self) -> bool {
        self.ignore_rendering == other.ignore_rendering
            && self.style == other.style
            && self.text_color == other.text_color
            && self.background == other.background
    }

    /// Whether rendering adds no escape sequences.
    #[must_use]
    pub fn is_unstyled(&self) -> bool {
        self.ignore_rendering
            || (self.style.is_plain()
                && self.text_color == Color::Default
                && self.background == Color::Default)
    }

    /// Number of bytes the escape sequences add around the characters.
    #[must_use]
    pub fn ansi_length(&self) -> usize {
        if self.is_unstyled() {
            0
        } else {
            self.start_sequence().len() + RESET.len()
        }
    }

    /// Renders the string, with escape sequences only when `color` is set.
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        if !color || self.is_unstyled() {
            return self.characters.clone();
        }
        format!("{}{}{RESET}", self.start_sequence(), self.characters)
    }

    /// Renders the string directly after `prev`, emitting a new sequence
    /// only if the attributes change. The caller resets at the end.
    #[must_use]
    pub fn render_after(&self, prev: &Self) -> String {
        if self.same_rendering(prev) || (self.is_unstyled() && prev.is_unstyled()) {
            return self.characters.clone();
        }
        if self.is_unstyled() {
            return format!("{RESET}{}", self.characters);
        }
        format!("{}{}", self.start_sequence(), self.characters)
    }

    fn start_sequence(&self) -> String {
        let mut codes = vec![0];
        codes.extend(self.style.codes());
        codes.push(self.text_color.text_code());
        codes.push(self.background.background_code());
        let codes: Vec<String> = codes.iter().map(u8::to_string).collect();
        format!("{ESC_START}{}m", codes.join(";"))
    }
}

impl fmt::Display for TerminalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Renders consecutive strings as one line.
#[must_use]
pub fn render_line(parts: &[TerminalString], color: bool) -> String {
    if !color {
        return parts.iter().map(TerminalString::characters).collect();
    }

    let mut out = String::new();
    let mut prev = TerminalString::plain("");
    let mut styled = false;
    for part in parts {
        out.push_str(&part.render_after(&prev));
        styled |= !part.is_unstyled();
        prev = part.with_characters("");
    }
    if styled && !prev.is_unstyled() {
        out.push_str(RESET);
    }
    out
}
