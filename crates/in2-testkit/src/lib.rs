//! Test utilities for the in2 crates.
//!
//! Template cases live in `cases/in2.test.yaml`:
//!
//! ```yaml
//! - name: reference
//!   definitions:
//!     name: World
//!   template: |
//!     Hello, @name@!
//!   compiled: |
//!     ...
//!   rendered: |
//!     Hello, World!
//! ```
//!
//! `compiled` is the whole script, annotations included, and is compared byte
//! for byte. `definitions`, `compiled` and `rendered` are optional.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One table-driven template case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateCase {
    pub name: String,
    /// `-D` definitions needed to render the template.
    #[serde(default)]
    pub definitions: BTreeMap<String, String>,
    pub template: String,
    /// The exact compiled script.
    #[serde(default)]
    pub compiled: Option<String>,
    /// The exact rendered output.
    #[serde(default)]
    pub rendered: Option<String>,
}

impl TemplateCase {
    /// Definitions as `(name, value)` pairs, sorted by name.
    pub fn definition_pairs(&self) -> Vec<(String, String)> {
        self.definitions
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid case table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Path of the shared case table.
pub fn cases_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("cases/in2.test.yaml")
}

/// Load the shared case table.
pub fn cases() -> Result<Vec<TemplateCase>, CaseError> {
    load_cases(cases_path())
}

/// Load a case table from a file.
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<TemplateCase>, CaseError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| CaseError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
