//! CMake process runner.

use crate::diagnostics::{parse_cmake_output, CmakeDiagnostic, DiagnosticRemapper};
use crate::{prelude, RenderError, RenderResult};
use in2_compiler::Compiled;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Options for rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Variables defined with `-D<name>=<value>` before the script runs.
    pub definitions: Vec<(String, String)>,
    /// The cmake executable. Looked up on `PATH` when unset.
    pub cmake: Option<PathBuf>,
    /// Forwarded as `CMAKE_MODULE_PATH`, for scripts that `include()` helpers.
    pub module_path: Option<PathBuf>,
    /// Run the compiled script without the built-in `render` and filters.
    pub skip_prelude: bool,
    /// Where to create the scratch directory. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl RenderOptions {
    pub fn with_definition(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.definitions.push((name.into(), value.into()));
        self
    }
}

/// The result of rendering one template.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// Text produced by the script's `render` calls.
    pub output: String,
    /// Warnings cmake reported while rendering.
    pub diagnostics: Vec<CmakeDiagnostic>,
}

/// Runs compiled templates with `cmake -P`.
pub struct CmakeRunner {
    cmake: PathBuf,
    options: RenderOptions,
}

impl CmakeRunner {
    /// Create a new runner, locating cmake.
    pub fn new(options: RenderOptions) -> RenderResult<Self> {
        let cmake = match &options.cmake {
            Some(path) => path.clone(),
            None => which::which("cmake").map_err(|_| {
                RenderError::not_found("cmake not found on PATH. Install CMake 3.20 or newer")
            })?,
        };
        Ok(Self { cmake, options })
    }

    /// The cmake executable in use.
    pub fn cmake(&self) -> &Path {
        &self.cmake
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a compiled template. `name` names the scratch files, `template`
    /// is the source `compiled` came from and is used to map diagnostics.
    pub async fn render(&self, name: &str, template: &str, compiled: &Compiled) -> RenderResult<Rendered> {
        let scratch = self.scratch_dir()?;
        let script_path = scratch.path().join(format!("{name}.in2.cmake"));
        let render_path = scratch.path().join(name);

        let prelude = if self.options.skip_prelude { "" } else { prelude::PRELUDE };
        tokio::fs::write(&script_path, format!("{prelude}{}", compiled.script))
            .await
            .map_err(|e| RenderError::io(format!("Failed to write {}: {}", script_path.display(), e)))?;
        tokio::fs::write(&render_path, "")
            .await
            .map_err(|e| RenderError::io(format!("Failed to write {}: {}", render_path.display(), e)))?;

        let mut cmd = Command::new(&self.cmake);
        for (name, value) in &self.options.definitions {
            cmd.arg(format!("-D{name}={value}"));
        }
        cmd.arg(define("RENDER_FILE", &render_path));
        if let Some(module_path) = &self.options.module_path {
            cmd.arg(define("CMAKE_MODULE_PATH", module_path));
        }
        cmd.arg("-P").arg(&script_path);

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            cmake = %self.cmake.display(),
            script = %script_path.display(),
            definitions = self.options.definitions.len(),
            "running cmake"
        );
        let output = cmd
            .output()
            .await
            .map_err(|e| RenderError::io(format!("Failed to run cmake: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let prelude_lines = if self.options.skip_prelude { 0 } else { prelude::line_count() };
        let mut diagnostics = parse_cmake_output(&stderr);
        DiagnosticRemapper::new(&script_path, template, compiled, prelude_lines).remap_all(&mut diagnostics);

        if !output.status.success() {
            tracing::debug!(status = %output.status, diagnostics = diagnostics.len(), "cmake failed");
            let mut message = format!("cmake failed to render {name} ({})", output.status);
            match diagnostics.first() {
                Some(first) => {
                    message.push_str(": ");
                    message.push_str(&first.format());
                }
                None if !stderr.trim().is_empty() => {
                    message.push_str(": ");
                    message.push_str(stderr.trim());
                }
                None => {}
            }
            return Err(RenderError::script(message, diagnostics));
        }

        let output = tokio::fs::read_to_string(&render_path)
            .await
            .map_err(|e| RenderError::io(format!("Failed to read {}: {}", render_path.display(), e)))?;

        Ok(Rendered { output, diagnostics })
    }

    fn scratch_dir(&self) -> RenderResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("in2-");
        let dir = match &self.options.temp_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        dir.map_err(|e| RenderError::io(format!("Failed to create scratch directory: {}", e)))
    }
}

/// `-D<name>=<path>` without a lossy conversion of the path.
fn define(name: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(format!("-D{name}="));
    arg.push(path);
    arg
}
