//! Rendering for compiled in2 templates.
//!
//! This crate turns templates into text by:
//! - Writing the compiled script after a prelude defining `render` and the
//!   built-in `template_filter_*` commands
//! - Running it with `cmake -P`
//! - Parsing cmake's diagnostics and mapping them back to template positions

pub mod diagnostics;
pub mod prelude;
pub mod runner;

pub use diagnostics::{CmakeDiagnostic, CmakeSeverity};
pub use runner::{CmakeRunner, RenderOptions, Rendered};

use in2_compiler::CompileError;
use thiserror::Error;

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// An error from rendering.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RenderError {
    /// The error message.
    pub message: String,
    /// The error kind.
    pub kind: RenderErrorKind,
    /// What cmake reported, for [`RenderErrorKind::Script`] failures.
    pub diagnostics: Vec<CmakeDiagnostic>,
}

impl RenderError {
    pub fn new(message: impl Into<String>, kind: RenderErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            diagnostics: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, RenderErrorKind::NotFound)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(message, RenderErrorKind::Io)
    }

    /// The script ran and failed.
    pub fn script(message: impl Into<String>, diagnostics: Vec<CmakeDiagnostic>) -> Self {
        Self {
            diagnostics,
            ..Self::new(message, RenderErrorKind::Script)
        }
    }
}

impl From<CompileError> for RenderError {
    fn from(err: CompileError) -> Self {
        Self::new(err.to_string(), RenderErrorKind::Compile)
    }
}

/// Kind of render error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorKind {
    /// cmake is not installed.
    NotFound,
    /// Scratch files or the cmake process could not be used.
    Io,
    /// The template did not compile.
    Compile,
    /// cmake reported an error while running the script.
    Script,
}

/// Compile a template with default options and render it.
pub async fn render_template(name: &str, template: &str, options: &RenderOptions) -> RenderResult<Rendered> {
    let compiled = in2_compiler::compile(template)?;
    let runner = CmakeRunner::new(options.clone())?;
    runner.render(name, template, &compiled).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error() {
        let err = RenderError::not_found("cmake not found");
        assert_eq!(err.kind, RenderErrorKind::NotFound);
        assert_eq!(err.to_string(), "cmake not found");
        assert!(err.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_compile_errors_surface_before_running() {
        let options = RenderOptions {
            cmake: Some("/nonexistent/in2/cmake".into()),
            ..Default::default()
        };
        let err = render_template("page", "@x | endforeach@", &options).await.unwrap_err();
        assert_eq!(err.kind, RenderErrorKind::Compile);
        assert!(err.message.contains("endforeach"));
    }
}
