//! CMake diagnostics parsing and remapping.
//!
//! `cmake -P` reports problems on stderr as blocks like:
//!
//! ```text
//! CMake Error at /tmp/in2-x/page.in2.cmake:52 (template_filter_nope):
//!   Unknown CMake command "template_filter_nope".
//! ```

use in2_compiler::Compiled;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use source_map::{LineCol, LineIndex};
use std::path::{Path, PathBuf};

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CMake (Error|Warning)(?: \(dev\))? at (.+?):(\d+)(?: \(([^)]*)\))?:\s*$")
        .unwrap_or_else(|err| panic!("invalid diagnostic pattern: {err}"))
});

/// A single diagnostic reported by cmake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmakeDiagnostic {
    pub severity: CmakeSeverity,
    /// The script cmake was running.
    pub file: PathBuf,
    /// Line in `file` (1-indexed).
    pub line: u32,
    /// The command that failed, if cmake named one.
    pub command: Option<String>,
    pub message: String,
    /// Position in the template that produced the failing statement.
    pub template: Option<LineCol>,
}

impl CmakeDiagnostic {
    /// Format as `<line>:<col>: <severity>: <message>`, preferring the
    /// template position when one is known.
    pub fn format(&self) -> String {
        let location = match self.template {
            Some(position) => {
                let (line, col) = position.to_display();
                format!("{line}:{col}")
            }
            None => format!("{}:{}", self.file.display(), self.line),
        };
        format!("{location}: {}: {}", self.severity.as_str(), self.message)
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CmakeSeverity {
    Error,
    Warning,
}

impl CmakeSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Parse every `CMake Error at ...` / `CMake Warning at ...` block.
pub fn parse_cmake_output(output: &str) -> Vec<CmakeDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut lines = output.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(header) = HEADER.captures(line) else {
            continue;
        };
        let Ok(line_number) = header[3].parse() else {
            continue;
        };

        // The message is the indented block under the header.
        let mut message = Vec::new();
        while let Some(&next) = lines.peek() {
            if !next.is_empty() && !next.starts_with(' ') {
                break;
            }
            message.push(next.trim());
            lines.next();
        }
        while message.last() == Some(&"") {
            message.pop();
        }

        diagnostics.push(CmakeDiagnostic {
            severity: if &header[1] == "Error" {
                CmakeSeverity::Error
            } else {
                CmakeSeverity::Warning
            },
            file: PathBuf::from(&header[2]),
            line: line_number,
            command: header.get(4).map(|m| m.as_str().to_string()),
            message: message.join("\n"),
            template: None,
        });
    }

    diagnostics
}

/// Maps script lines back to template positions.
pub struct DiagnosticRemapper<'a> {
    script: &'a Path,
    compiled: &'a Compiled,
    template: LineIndex,
    prelude_lines: u32,
}

impl<'a> DiagnosticRemapper<'a> {
    /// `prelude_lines` is the number of lines written ahead of the compiled
    /// script in `script`.
    pub fn new(script: &'a Path, template: &str, compiled: &'a Compiled, prelude_lines: u32) -> Self {
        Self {
            script,
            compiled,
            template: LineIndex::new(template),
            prelude_lines,
        }
    }

    /// Fill in the template position of a diagnostic raised by the script.
    pub fn remap(&self, diagnostic: &mut CmakeDiagnostic) {
        if diagnostic.file.file_name() != self.script.file_name() {
            return;
        }
        let Some(line) = diagnostic.line.checked_sub(self.prelude_lines) else {
            return;
        };
        diagnostic.template = self
            .compiled
            .template_span_at_line(line)
            .map(|span| self.template.line_col(span.start));
    }

    pub fn remap_all(&self, diagnostics: &mut [CmakeDiagnostic]) {
        for diagnostic in diagnostics {
            self.remap(diagnostic);
        }
    }
}
