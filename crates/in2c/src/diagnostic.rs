//! Miette diagnostic wrapper for template compile errors.
//!
//! Note: Fields are read by miette derive macros, which rustc cannot track.
#![allow(unused_assignments)]

use in2_compiler::{CompileError, CompileErrorCode};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A compile error with the template it came from.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(in2::compile))]
pub struct CompileDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{code}")]
    span: SourceSpan,

    code: CompileErrorCode,

    message: String,

    #[help]
    help: Option<String>,
}

impl CompileDiagnostic {
    pub fn new(name: &str, source: &str, err: &CompileError) -> Self {
        // Keep the span inside the source so miette can render it.
        let start = (err.span.start as usize).min(source.len());
        let end = (err.span.end as usize).clamp(start, source.len());

        let help = match err.code {
            CompileErrorCode::UnmatchedEndforeach => {
                "add a `foreach` stage earlier in the pipeline, or remove this one"
            }
            CompileErrorCode::UnclosedForeach => "close every `foreach` stage with an `endforeach`",
        };

        CompileDiagnostic {
            src: NamedSource::new(name, source.to_string()),
            span: (start, end - start).into(),
            code: err.code,
            message: err.message.clone(),
            help: Some(help.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_compile_error() {
        let source = "x @v | endforeach@";
        let err = in2_compiler::compile(source).unwrap_err();
        let diagnostic = CompileDiagnostic::new("<stdin>", source, &err);

        assert_eq!(diagnostic.span, SourceSpan::from((7, 10)));
        assert_eq!(diagnostic.to_string(), "endforeach without a matching foreach");
        assert!(diagnostic.help.is_some());
    }

    #[test]
    fn test_span_is_clamped() {
        let err = CompileError::unclosed_foreach(1, in2_compiler::Span::new(2, 40));
        let diagnostic = CompileDiagnostic::new("<stdin>", "abc", &err);
        assert_eq!(diagnostic.span, SourceSpan::from((2, 1)));
    }
}
