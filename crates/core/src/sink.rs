//! Output sinks for rendered diagrams.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SinkError;

/// Persists generated text under a path.
pub trait OutputSink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), SinkError>;
}

/// Writes files below a base directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    base: PathBuf,
}

impl FsSink {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl OutputSink for FsSink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), SinkError> {
        let target = self.base.join(path);
        let to_err = |source| SinkError::Write {
            path: target.clone(),
            source,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(to_err)?;
        }
        fs::write(&target, contents).map_err(to_err)?;
        info!(path = %target.display(), "wrote output");
        Ok(())
    }
}

/// Keeps writes in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), SinkError> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
