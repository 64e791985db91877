//! Cursor over a template and the character sets used to scan it.

use source_map::Span;
use std::fmt;
use std::ops::{BitOr, Not};

/// Byte reported at the end of the template. An embedded NUL ends scanning too.
pub const SENTINEL: u8 = 0;

/// A set of bytes, tested in constant time.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CharSet {
    bits: [u64; 4],
}

impl CharSet {
    /// The set containing exactly the given bytes.
    pub const fn of(chars: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            bits[(c >> 6) as usize] |= 1u64 << (c & 63);
            i += 1;
        }
        Self { bits }
    }

    pub const fn union(self, other: CharSet) -> Self {
        let mut bits = self.bits;
        let mut i = 0;
        while i < 4 {
            bits[i] |= other.bits[i];
            i += 1;
        }
        Self { bits }
    }

    /// Every byte not in this set.
    pub const fn invert(self) -> Self {
        let mut bits = self.bits;
        let mut i = 0;
        while i < 4 {
            bits[i] = !bits[i];
            i += 1;
        }
        Self { bits }
    }

    #[inline]
    pub const fn contains(&self, c: u8) -> bool {
        self.bits[(c >> 6) as usize] & (1u64 << (c & 63)) != 0
    }
}

impl BitOr for CharSet {
    type Output = CharSet;

    fn bitor(self, rhs: CharSet) -> CharSet {
        self.union(rhs)
    }
}

impl Not for CharSet {
    type Output = CharSet;

    fn not(self) -> CharSet {
        self.invert()
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries((0..=u8::MAX).filter(|&c| self.contains(c)).map(char::from))
            .finish()
    }
}

pub const SPACE: CharSet = CharSet::of(b" \r\n\t");
pub const LINE_END: CharSet = CharSet::of(b"\r\n");
pub const EQUALS: CharSet = CharSet::of(b"=");

/// A position in a template, with the line/column bookkeeping needed for
/// annotations.
///
/// Columns count bytes. Cursors over the same template compare by position.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    source: &'a str,
    line_start: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    /// A cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line_start: 0,
            line: 0,
            column: 0,
        }
    }

    /// Byte offset into the template.
    #[inline]
    pub fn offset(&self) -> usize {
        self.line_start + self.column as usize
    }

    /// 0-indexed line.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The byte under the cursor, or [`SENTINEL`] at the end.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.offset())
            .copied()
            .unwrap_or(SENTINEL)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.peek() == SENTINEL
    }

    /// Move one byte forward. Does nothing at the end.
    pub fn advance(&mut self) {
        match self.peek() {
            SENTINEL => {}
            b'\n' => {
                self.line_start = self.offset() + 1;
                self.column = 0;
                self.line += 1;
            }
            _ => self.column += 1,
        }
    }

    /// A copy of this cursor moved one byte forward.
    #[must_use]
    pub fn advanced(mut self) -> Self {
        self.advance();
        self
    }

    /// The first position at or after this one whose byte is in `set`, or
    /// the end.
    #[must_use]
    pub fn find_first(mut self, set: CharSet) -> Self {
        while !self.is_at_end() && !set.contains(self.peek()) {
            self.advance();
        }
        self
    }

    /// The line containing the cursor, from its start up to the first line
    /// break at or after the cursor.
    pub fn view_line(&self) -> &'a str {
        let end = self.find_first(LINE_END);
        &self.source[self.line_start..end.offset()]
    }

    /// The text between this cursor and `end`.
    pub fn view_to(&self, end: Cursor<'_>) -> &'a str {
        &self.source[self.offset()..end.offset()]
    }

    pub fn span_to(&self, end: Cursor<'_>) -> Span {
        Span::from(self.offset()..end.offset())
    }

    /// 1-indexed `line:column`.
    pub fn line_column(&self) -> String {
        format!("{}:{}", self.line + 1, self.column + 1)
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.line_start == other.line_start
            && self.line == other.line
            && self.column == other.column
    }
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({} @{})", self.line_column(), self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_set_membership() {
        let set = CharSet::of(b"@]");
        assert!(set.contains(b'@'));
        assert!(set.contains(b']'));
        assert!(!set.contains(b'['));
        assert!(!set.contains(SENTINEL));

        let inverted = !EQUALS;
        assert!(!inverted.contains(b'='));
        assert!(inverted.contains(b'['));
        assert!(inverted.contains(0xff));
    }

    #[test]
    fn test_char_set_union() {
        let set = SPACE | CharSet::of(b"@");
        for c in b" \r\n\t@" {
            assert!(set.contains(*c));
        }
        assert!(!set.contains(b'a'));
        assert_eq!(set, SPACE.union(CharSet::of(b"@")));
    }

    #[test]
    fn test_advance_tracks_lines() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance();
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (0, 2));
        assert_eq!(cursor.peek(), b'\n');

        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 0));
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.line_column(), "2:1");
        assert_eq!(cursor.view_line(), "cd");
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut cursor = Cursor::new("a");
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.peek(), SENTINEL);
    }

    #[test]
    fn test_embedded_nul_is_end() {
        let cursor = Cursor::new("ab\0cd").find_first(CharSet::of(b"c"));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_find_first_and_views() {
        let begin = Cursor::new("key = value\nnext");
        let end = begin.find_first(EQUALS);
        assert_eq!(begin.view_to(end), "key ");
        assert_eq!(end.view_line(), "key = value");
        assert_eq!(begin.span_to(end), Span::new(0, 4));

        let missing = begin.find_first(CharSet::of(b"@"));
        assert!(missing.is_at_end());
        assert_eq!(missing.line_column(), "2:5");
    }

    #[test]
    fn test_view_line_stops_at_carriage_return() {
        let cursor = Cursor::new("abc\r\ndef").advanced();
        assert_eq!(cursor.view_line(), "abc");
    }
}
