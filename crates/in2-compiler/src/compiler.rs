//! The compile loop: literal chunks alternating with `@...@` directives.

use crate::cursor::{CharSet, Cursor};
use crate::directive::{compile_command, compile_reference};
use crate::emit::Emitter;
use crate::error::CompileResult;
use crate::literal::compile_literal;
use crate::pipeline::compile_pipeline;
use crate::{CompileOptions, Compiled};

/// What follows `@`: the closing `@` of a reference, the `(` of a command, or
/// the `|` of a pipeline.
const DIRECTIVE_KIND: CharSet = CharSet::of(b"@(|");

/// Compile an in2 template with the given options.
pub fn compile_with(source: &str, options: &CompileOptions) -> CompileResult<Compiled> {
    tracing::debug!(bytes = source.len(), "compiling in2 template");

    let mut out = Emitter::new(options);
    let mut cursor = Cursor::new(source);
    while !cursor.is_at_end() {
        let marker = compile_literal(cursor, &mut out);
        if marker.is_at_end() {
            break;
        }
        cursor = compile_directive(marker.advanced(), &mut out)?;
    }

    let (script, source_map) = out.finish();
    tracing::debug!(
        bytes = script.len(),
        statements = source_map.len(),
        "compiled in2 template"
    );
    Ok(Compiled { script, source_map })
}

/// Compile the directive starting just past its opening `@`. Returns the
/// position to resume literal text at.
fn compile_directive<'a>(begin: Cursor<'a>, out: &mut Emitter<'_>) -> CompileResult<Cursor<'a>> {
    if begin.is_at_end() {
        return Ok(begin);
    }

    if begin.peek() == b'@' {
        out.annotate("@@ -> @", begin, begin);
        out.statement("render(\"@\")\n", begin.span_to(begin.advanced()));
        return Ok(begin.advanced());
    }

    let end = begin.find_first(DIRECTIVE_KIND);
    let end = match end.peek() {
        b'(' => compile_command(begin, end, out),
        b'|' => return compile_pipeline(begin, end, out),
        _ => {
            compile_reference(begin, end, out);
            end
        }
    };
    // Step over the closing `@`.
    Ok(end.advanced())
}
