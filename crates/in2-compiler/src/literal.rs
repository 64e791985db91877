//! Plain template text, emitted as bracket-argument `render` statements.

use crate::cursor::{CharSet, Cursor, EQUALS, SENTINEL};
use crate::emit::Emitter;

/// A chunk always ends at `@`. A `]` may start a run that would close the
/// wrapping bracket early.
const LITERAL_STOP: CharSet = CharSet::of(b"@]");

/// Emit the text from `begin` up to the next `@` (or the end) and return the
/// position where it stopped.
pub(crate) fn compile_literal<'a>(begin: Cursor<'a>, out: &mut Emitter<'_>) -> Cursor<'a> {
    let mut end = begin;
    let mut fill = 0;

    loop {
        end = end.find_first(LITERAL_STOP);
        if end.peek() != b']' {
            break;
        }

        // `Hello ]=] ` -> `render([=[Hello ]=] ]=])` closes too early, and so
        // does a `]=` right before `@` or the end of input, since the
        // wrapper's own `]=]` follows it. `Hello ]= ` is harmless.
        let bracket = end;
        end = end.advanced().find_first(!EQUALS);
        if !matches!(end.peek(), b']' | b'@' | SENTINEL) {
            continue;
        }
        fill = fill.max(end.offset() - bracket.offset());
    }

    if begin == end {
        return end;
    }

    out.annotate("literal", begin, end);

    let fill = "=".repeat(fill);
    // A bracket argument drops one leading newline.
    let newline = if begin.peek() == b'\n' { "\n" } else { "" };
    out.statement(
        &format!("render([{fill}[{newline}{}]{fill}])\n", begin.view_to(end)),
        begin.span_to(end),
    );
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompileOptions;
    use pretty_assertions::assert_eq;

    fn statements(source: &str) -> (String, usize) {
        let options = CompileOptions::default().with_annotations(false);
        let mut out = Emitter::new(&options);
        let end = compile_literal(Cursor::new(source), &mut out);
        (out.finish().0, end.offset())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(statements("Hello, world!"), ("render([[Hello, world!]])\n".into(), 13));
    }

    #[test]
    fn test_stops_at_marker() {
        assert_eq!(statements("a @b@"), ("render([[a ]])\n".into(), 2));
    }

    #[test]
    fn test_empty_chunk_emits_nothing() {
        assert_eq!(statements("@name@"), (String::new(), 0));
        assert_eq!(statements(""), (String::new(), 0));
    }

    #[test]
    fn test_leading_newline_is_doubled() {
        assert_eq!(statements("\nx\n"), ("render([[\n\nx\n]])\n".into(), 3));
    }

    #[test]
    fn test_fill_exceeds_closing_runs() {
        assert_eq!(
            statements("a ]==] b"),
            ("render([===[a ]==] b]===])\n".into(), 8)
        );
        assert_eq!(statements("a ]] b"), ("render([=[a ]] b]=])\n".into(), 6));
    }

    #[test]
    fn test_fill_keeps_widest_run() {
        assert_eq!(
            statements("]==] then ]=]"),
            ("render([===[]==] then ]=]]===])\n".into(), 13)
        );
    }

    #[test]
    fn test_run_before_marker_or_end() {
        assert_eq!(statements("x]=@"), ("render([==[x]=]==])\n".into(), 3));
        assert_eq!(statements("x]"), ("render([=[x]]=])\n".into(), 2));
    }

    #[test]
    fn test_harmless_runs_do_not_widen() {
        assert_eq!(statements("a ]= b ]x"), ("render([[a ]= b ]x]])\n".into(), 9));
    }

    #[test]
    fn test_overlapping_runs() {
        // The second `]` of `]]` starts its own run `]=]`.
        assert_eq!(statements("]]=]"), ("render([==[]]=]]==])\n".into(), 4));
    }
}
