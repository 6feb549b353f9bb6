use serde::Serialize;

/// A source location: 1-based line, 0-based column, and a monotone byte
/// offset into the source buffer.
///
/// Every token produced by the tokenizer carries one of these. Line is
/// 1-based (so the first line of a file is `1`), column is 0-based (so the
/// first character of a line is column `0`); `offset` is the byte index a
/// caller can slice the original buffer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self { line, column, offset }
    }

    /// The position of the very start of a buffer.
    pub const fn start() -> Self {
        Self { line: 1, column: 0, offset: 0 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Tracks line/column while scanning a byte offset forward through source.
///
/// The tokenizer advances a single `PositionTracker` across the whole
/// buffer rather than recomputing line/column from scratch per token, since
/// offsets are visited in monotone order.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    line: u32,
    column: u32,
    offset: u32,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self { line: 1, column: 0, offset: 0 }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    /// Advance the tracker past one source character, given its UTF-8
    /// byte length. Newlines reset the column and bump the line.
    pub fn advance(&mut self, ch: char) {
        self.offset += ch.len_utf8() as u32;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_one_one_zero() {
        let p = Position::start();
        assert_eq!((p.line, p.column, p.offset), (1, 0, 0));
    }

    #[test]
    fn tracker_advances_columns() {
        let mut t = PositionTracker::new();
        t.advance('a');
        t.advance('b');
        assert_eq!(t.position(), Position::new(1, 2, 2));
    }

    #[test]
    fn tracker_resets_on_newline() {
        let mut t = PositionTracker::new();
        t.advance('a');
        t.advance('\n');
        t.advance('b');
        assert_eq!(t.position(), Position::new(2, 1, 3));
    }

    #[test]
    fn tracker_counts_multibyte_chars_by_byte_length() {
        let mut t = PositionTracker::new();
        t.advance('é'); // 2 bytes in UTF-8
        assert_eq!(t.position().offset, 2);
        assert_eq!(t.position().column, 1);
    }
}
