//! Skipping over string literals of the target language.
//!
//! Delimiter searches inside command blocks and pipeline stages must not stop
//! on characters that belong to a quoted (`"..."`) or long-bracket
//! (`[==[...]==]`) string. Unterminated strings run to the end of input.

use crate::cursor::{CharSet, Cursor, EQUALS, SENTINEL};

const QUOTE_OR_ESCAPE: CharSet = CharSet::of(b"\"\\");
const CLOSE_BRACKET: CharSet = CharSet::of(b"]");
const STRING_OPEN: CharSet = CharSet::of(b"[\"");

/// Skip a quoted string starting at its opening `"`. Returns the position
/// just past the closing quote, or the end.
pub fn find_end_of_quoted_string(mut cursor: Cursor<'_>) -> Cursor<'_> {
    debug_assert_eq!(cursor.peek(), b'"');
    loop {
        cursor.advance();
        cursor = cursor.find_first(QUOTE_OR_ESCAPE);
        match cursor.peek() {
            SENTINEL => return cursor,
            b'"' => return cursor.advanced(),
            // Backslash: the escaped byte is skipped by the next advance.
            _ => cursor.advance(),
        }
    }
}

/// Skip a long-bracket string starting at its first `[`.
///
/// If the `=` run after the `[` is not followed by a second `[`, this is not
/// a long-bracket string and the position after the run is returned. Otherwise
/// returns the position just past the matching `]=*]`, or the end.
pub fn find_end_of_long_bracket(cursor: Cursor<'_>) -> Cursor<'_> {
    debug_assert_eq!(cursor.peek(), b'[');
    let open = cursor.advanced();
    let mut cursor = open.find_first(!EQUALS);
    if cursor.peek() != b'[' {
        return cursor;
    }
    let open_len = cursor.offset() - open.offset();

    loop {
        cursor = cursor.find_first(CLOSE_BRACKET);
        if cursor.is_at_end() {
            return cursor;
        }

        let close = cursor.advanced();
        cursor = close.find_first(!EQUALS);
        if cursor.is_at_end() {
            return cursor;
        }
        // A `]` that ends a run of the wrong length may itself open the real
        // closer, so the search resumes on it.
        if cursor.peek() != b']' || cursor.offset() - close.offset() != open_len {
            continue;
        }
        return cursor.advanced();
    }
}

/// Skip whichever kind of string starts at the cursor.
pub fn find_end_of_string(cursor: Cursor<'_>) -> Cursor<'_> {
    if cursor.peek() == b'"' {
        find_end_of_quoted_string(cursor)
    } else {
        find_end_of_long_bracket(cursor)
    }
}

/// Like [`Cursor::find_first`], but never stops inside a string literal.
pub fn skipping_strings_find_first(real_end: CharSet, mut cursor: Cursor<'_>) -> Cursor<'_> {
    loop {
        cursor = cursor.find_first(real_end | STRING_OPEN);
        if cursor.is_at_end() || real_end.contains(cursor.peek()) {
            return cursor;
        }
        cursor = find_end_of_string(cursor);
        if cursor.is_at_end() {
            return cursor;
        }
    }
}
