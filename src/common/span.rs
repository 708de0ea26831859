use std::fmt;

use serde::{Deserialize, Serialize};

/// A line/column pair into a source. Both components
/// count from 1; columns are byte columns and reset on
/// every newline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    #[serde(rename = "ln")]
    pub line: u32,
    #[serde(rename = "col")]
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }

    /// The position of the very first byte of any source.
    pub fn start() -> Position {
        Position { line: 1, column: 1 }
    }

    /// The position one byte past `self`, given the byte
    /// under the cursor.
    pub fn advance(&self, byte: u8) -> Position {
        if byte == b'\n' {
            Position {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Position {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A `Span` is a half-open region of a source, `start`
/// inclusive, `end` exclusive. Spans are byte-monotonic:
/// combining two spans always produces a span that covers
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Span {
        Span { start, end }
    }

    /// A `Span` that points at a specific position without
    /// covering any bytes.
    pub fn point(at: Position) -> Span {
        Span { start: at, end: at }
    }

    /// Creates a new `Span` which spans the space of the
    /// previous two.
    /// ```plain
    /// hello this is cool
    /// ^^^^^              | Span a
    ///            ^^      | Span b
    /// ^^^^^^^^^^^^^      | combined
    /// ```
    pub fn combine(a: &Span, b: &Span) -> Span {
        Span {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }

    /// Combines a set of `Span`s (think fold-left over
    /// `Span::combine`).
    pub fn join(spans: &[Span]) -> Option<Span> {
        let mut iter = spans.iter();
        let mut combined = *iter.next()?;
        for span in iter {
            combined = Span::combine(&combined, span);
        }
        Some(combined)
    }

    /// Whether `other` lies entirely within `self`.
    /// Sentinel nodes may share their parent's span, so
    /// the check is inclusive on both ends.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A wrapper for spanning types.
/// For example, a token can be spanned to indicate where
/// it was lexed from (a `Spanned<Token>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> {
        Spanned { item, span }
    }

    /// Applies a function to the item, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            item: f(self.item),
            span: self.span,
        }
    }
}
