//! Styled text spans
//!
//! Formatting logic composes [`Span`]s into [`Line`]s and never touches
//! escape sequences directly. Only [`Line::to_ansi`] turns styles into
//! terminal codes, via `colored`.

use colored::{Color, ColoredString, Colorize};

/// Foreground colors used by the request log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Blue
    Blue,
    /// Green
    Green,
    /// Cyan
    Cyan,
    /// Red
    Red,
    /// Yellow
    Yellow,
    /// White
    White,
    /// Gray (bright black)
    Gray,
}

impl From<Tone> for Color {
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Blue => Self::Blue,
            Tone::Green => Self::Green,
            Tone::Cyan => Self::Cyan,
            Tone::Red => Self::Red,
            Tone::Yellow => Self::Yellow,
            Tone::White => Self::White,
            Tone::Gray => Self::BrightBlack,
        }
    }
}

/// Visual style of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color, `None` for the terminal default
    pub tone: Option<Tone>,
    /// Bold weight
    pub bold: bool,
    /// Dimmed intensity
    pub dimmed: bool,
}

impl Style {
    /// Unstyled text
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            tone: None,
            bold: false,
            dimmed: false,
        }
    }

    /// Text in the given color
    #[must_use]
    pub const fn tone(tone: Tone) -> Self {
        Self {
            tone: Some(tone),
            bold: false,
            dimmed: false,
        }
    }

    /// Same style, bold
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Same style, dimmed
    #[must_use]
    pub const fn dimmed(mut self) -> Self {
        self.dimmed = true;
        self
    }

    /// Dim the style only when `dim` is set
    #[must_use]
    pub const fn dimmed_if(self, dim: bool) -> Self {
        if dim {
            self.dimmed()
        } else {
            self
        }
    }

    fn apply(self, text: &str) -> ColoredString {
        let mut styled = text.normal();
        if let Some(tone) = self.tone {
            styled = styled.color(Color::from(tone));
        }
        if self.bold {
            styled = styled.bold();
        }
        if self.dimmed {
            styled = styled.dimmed();
        }
        styled
    }
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The text
    pub text: String,
    /// Its style
    pub style: Style,
}

impl Span {
    /// Create a styled span
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create an unstyled span
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::plain())
    }
}

/// One output line, made of spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    /// Create an empty line
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Append a span
    #[must_use]
    pub fn with(mut self, span: Span) -> Self {
        self.push(span);
        self
    }

    /// Append a span in place
    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// The spans, in order
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// First span whose text equals `text`
    #[must_use]
    pub fn find(&self, text: &str) -> Option<&Span> {
        self.spans.iter().find(|span| span.text == text)
    }

    /// The line's text without any styling
    #[must_use]
    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// The line's text with inline terminal escape codes.
    ///
    /// Honors `colored`'s global override, so this degrades to
    /// [`Line::to_plain`] output when colors are disabled.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        self.spans
            .iter()
            .map(|span| {
                if span.style == Style::plain() {
                    span.text.clone()
                } else {
                    span.style.apply(&span.text).to_string()
                }
            })
            .collect()
    }
}
