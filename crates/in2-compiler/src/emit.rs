//! Output stream shared by the fragment compilers of one compile call.

use crate::annotate::annotation;
use crate::cursor::Cursor;
use crate::CompileOptions;
use source_map::{ScriptBuilder, SourceMap, Span};

pub(crate) struct Emitter<'o> {
    builder: ScriptBuilder,
    options: &'o CompileOptions,
}

impl<'o> Emitter<'o> {
    pub(crate) fn new(options: &'o CompileOptions) -> Self {
        Self {
            builder: ScriptBuilder::new(),
            options,
        }
    }

    pub(crate) fn options(&self) -> &CompileOptions {
        self.options
    }

    /// Append the annotation block for `[begin, end)`, if enabled.
    pub(crate) fn annotate(&mut self, label: &str, begin: Cursor<'_>, end: Cursor<'_>) {
        tracing::trace!(label, from = %begin.line_column(), to = %end.line_column(), "fragment");
        if self.options.annotations {
            self.builder.push_str(&annotation(label, begin, end));
        }
    }

    /// Append statements compiled from the template span `source`.
    pub(crate) fn statement(&mut self, code: &str, source: Span) {
        self.builder.push_mapped(code, source);
    }

    pub(crate) fn finish(self) -> (String, SourceMap) {
        self.builder.finish()
    }
}
