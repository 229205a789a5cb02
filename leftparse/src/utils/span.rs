//! Locations in the input text, attached to tokens and lexical errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte offset plus 1-based line and character column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// First character of the input
    pub const START: Position = Position::new(0, 1, 1);

    pub const fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Position just after `ch`
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self::new(self.offset + 1, self.line + 1, 1),
            _ => Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1),
        }
    }

    /// Position after `len` ASCII characters without a line break
    pub fn advance_ascii(self, len: usize) -> Self {
        Self::new(self.offset + len, self.line, self.column + len as u32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[start, end)` of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset, "span ends before it starts");
        Self { start, end }
    }

    /// The character `ch` found at `at`
    pub fn of_char(at: Position, ch: char) -> Self {
        Self::new(at, at.advance(ch))
    }

    /// One ASCII byte at `at`, e.g. a parenthesis
    pub fn byte(at: Position) -> Self {
        Self::new(at, at.advance_ascii(1))
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Covered text, or `None` when the span lies outside `source`
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start.offset..self.end.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_moves_to_next_line() {
        let pos = Position::START.advance('a').advance('\n').advance('b');
        assert_eq!(pos, Position::new(3, 2, 2));
    }

    #[test]
    fn test_multibyte_char_is_one_column() {
        let pos = Position::START.advance('é');
        assert_eq!((pos.offset, pos.column), (2, 2));

        let span = Span::of_char(Position::START, '€');
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_slice_and_display() {
        let source = "(ab cd)";
        let start = Position::START.advance_ascii(1);
        let span = Span::new(start, start.advance_ascii(2));

        assert_eq!(span.slice(source), Some("ab"));
        assert_eq!(span.to_string(), "1:2..1:4");
        assert_eq!(Span::byte(Position::new(40, 1, 41)).slice(source), None);
    }
}
