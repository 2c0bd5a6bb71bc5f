//! Human-readable node labels.
//!
//! A label is the project-relative path with the source root stripped and
//! the extension removed. `index` modules collapse onto their directory, so
//! `src/components/Button/index.tsx` and `src/components/Button.tsx` share
//! the label `components/Button`. The builder treats equal labels as one
//! node; that merge is intended.

use std::path::Path;

use crate::path_policy::PathPolicy;

/// Default source-root prefix stripped from labels.
pub const DEFAULT_SOURCE_ROOT: &str = "src/";

#[derive(Debug, Clone)]
pub struct Labeler {
    policy: PathPolicy,
    source_root: String,
}

impl Labeler {
    pub fn new(policy: PathPolicy, source_root: impl Into<String>) -> Self {
        let mut source_root = source_root.into();
        if !source_root.is_empty() && !source_root.ends_with('/') {
            source_root.push('/');
        }
        Self {
            policy,
            source_root,
        }
    }

    pub fn policy(&self) -> &PathPolicy {
        &self.policy
    }

    pub fn source_root(&self) -> &str {
        &self.source_root
    }

    /// Label for an absolute module path.
    pub fn label(&self, path: &Path) -> String {
        self.label_relative(&self.policy.normalize(path))
    }

    /// Label for an already normalized project-relative path.
    pub fn label_relative(&self, relative: &str) -> String {
        let trimmed = relative
            .strip_prefix(self.source_root.as_str())
            .unwrap_or(relative);

        let (dir, file) = match trimmed.rsplit_once('/') {
            Some((dir, file)) => (Some(dir), file),
            None => (None, trimmed),
        };
        let stem = file_stem(file);

        match dir {
            Some(dir) if stem.eq_ignore_ascii_case("index") => dir.to_string(),
            Some(dir) => format!("{dir}/{stem}"),
            None if stem.eq_ignore_ascii_case("index") => ".".to_string(),
            None => stem.to_string(),
        }
    }
}

/// File name minus its last extension. Leading-dot names keep their dot.
fn file_stem(file: &str) -> &str {
    match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    }
}
