//! Error types for in2 compilation.

use source_map::Span;
use std::fmt;
use thiserror::Error;

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// A malformed template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    /// The error message.
    pub message: String,
    /// The template span the error refers to.
    pub span: Span,
    /// The error code.
    pub code: CompileErrorCode,
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span, code: CompileErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// An `endforeach` stage with no open `foreach` in its pipeline.
    pub fn unmatched_endforeach(span: Span) -> Self {
        Self::new(
            "endforeach without a matching foreach",
            span,
            CompileErrorCode::UnmatchedEndforeach,
        )
    }

    /// A pipeline that ends while `depth` loops are still open.
    pub fn unclosed_foreach(depth: usize, span: Span) -> Self {
        let plural = if depth == 1 { "" } else { "s" };
        Self::new(
            format!("pipeline ends with {depth} unclosed foreach loop{plural}"),
            span,
            CompileErrorCode::UnclosedForeach,
        )
    }
}

/// Error codes for template compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileErrorCode {
    UnmatchedEndforeach,
    UnclosedForeach,
}

impl CompileErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnmatchedEndforeach => "unmatched-endforeach",
            Self::UnclosedForeach => "unclosed-foreach",
        }
    }
}

impl fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from [`compile_in2`](crate::compile_in2), which also does I/O.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to read or write template stream")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_foreach_message() {
        let one = CompileError::unclosed_foreach(1, Span::new(0, 4));
        assert_eq!(one.to_string(), "pipeline ends with 1 unclosed foreach loop");
        assert_eq!(one.code.as_str(), "unclosed-foreach");

        let two = CompileError::unclosed_foreach(2, Span::new(0, 4));
        assert_eq!(two.to_string(), "pipeline ends with 2 unclosed foreach loops");
    }
}
