//! Compiler for in2 templates.
//!
//! An in2 template is plain text with `@...@` directives. Compiling it
//! produces a CMake script whose `render(...)` calls reproduce the text:
//!
//! - `@name@` renders the value of a variable,
//! - `@@` renders a literal `@`,
//! - `@set(x 1)@` (any directive containing `(` before `@` or `|`) is copied
//!   into the script verbatim,
//! - `@value | filter() | foreach | filter() | endforeach@` runs `value`
//!   through `template_filter_*` commands, mapping over lists between
//!   `foreach` and `endforeach`.
//!
//! Every fragment is preceded by a comment block pointing at its template
//! source, and the returned [`Compiled`] maps script offsets back to
//! template spans.

pub mod annotate;
mod compiler;
pub mod cursor;
mod directive;
mod emit;
pub mod error;
mod literal;
mod pipeline;
pub mod strings;

use source_map::{LineCol, LineIndex};
use std::io::{Read, Write};

pub use compiler::compile_with;
pub use error::{CompileError, CompileErrorCode, CompileResult, StreamError};
pub use source_map::{SourceMap, Span};

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Reject `endforeach` without a matching `foreach`, and pipelines that
    /// end with loops still open.
    pub strict_foreach: bool,
    /// Emit a comment block before each compiled fragment.
    pub annotations: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict_foreach: true,
            annotations: true,
        }
    }
}

impl CompileOptions {
    pub fn with_strict_foreach(mut self, strict_foreach: bool) -> Self {
        self.strict_foreach = strict_foreach;
        self
    }

    pub fn with_annotations(mut self, annotations: bool) -> Self {
        self.annotations = annotations;
        self
    }
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    /// The generated CMake script.
    pub script: String,
    /// Mappings from script statements back to template spans.
    pub source_map: SourceMap,
}

impl Compiled {
    /// The template span compiled into the statement at `generated_offset`.
    pub fn template_span(&self, generated_offset: u32) -> Option<Span> {
        self.source_map.source_span(generated_offset)
    }

    /// The template span compiled into the statement starting on the given
    /// 1-indexed script line, as reported by cmake.
    pub fn template_span_at_line(&self, line: u32) -> Option<Span> {
        let index = LineIndex::new(&self.script);
        let offset = index.offset(LineCol::new(line.checked_sub(1)?, 0))?;
        self.template_span(offset)
    }
}

/// Compile an in2 template with default options.
pub fn compile(source: &str) -> CompileResult<Compiled> {
    compile_with(source, &CompileOptions::default())
}

/// Read a whole template from `input` and write its compiled script to
/// `output`.
pub fn compile_in2(
    mut input: impl Read,
    mut output: impl Write,
    options: &CompileOptions,
) -> Result<(), StreamError> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;
    let compiled = compile_with(&source, options)?;
    output.write_all(compiled.script.as_bytes())?;
    output.flush()?;
    Ok(())
}
