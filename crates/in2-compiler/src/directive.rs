//! Variable references and command blocks.

use crate::cursor::{CharSet, Cursor, SPACE};
use crate::emit::Emitter;
use crate::strings::skipping_strings_find_first;

const MARKER: CharSet = CharSet::of(b"@");
const REFERENCE_END: CharSet = SPACE.union(CharSet::of(b"@|"));

/// The quoted variable expansion for the name starting at `begin`, after
/// leading whitespace.
pub(crate) fn reference_expr(begin: Cursor<'_>) -> String {
    let begin = begin.find_first(!SPACE);
    let end = begin.find_first(REFERENCE_END);
    format!("\"${{{}}}\"", begin.view_to(end))
}

/// `@name@`: `begin` is just past the opening `@`, `end` on the closing one.
pub(crate) fn compile_reference(begin: Cursor<'_>, end: Cursor<'_>, out: &mut Emitter<'_>) {
    out.annotate("reference", begin, end);
    out.statement(&format!("render({})\n", reference_expr(begin)), begin.span_to(end));
}

/// `@set(x 1)@`: the directive text is copied verbatim. `paren` is the first
/// `(`; the block ends at the first `@` outside a string. Returns the
/// position of that `@`, or the end.
pub(crate) fn compile_command<'a>(
    begin: Cursor<'a>,
    paren: Cursor<'a>,
    out: &mut Emitter<'_>,
) -> Cursor<'a> {
    let end = skipping_strings_find_first(MARKER, paren);
    out.annotate("commands", begin, end);
    out.statement(&format!("{}\n", begin.view_to(end)), begin.span_to(end));
    end
}
