//! Project-relative path normalization and location classification.

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

/// Path segment marking a vendored dependency tree.
pub const VENDOR_MARKER: &str = "node_modules";

/// Where a resolved module lives relative to the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Project source; eligible to become a node.
    Internal,
    /// Under a vendored dependency tree.
    External,
    /// Escapes the project root.
    OutsideRoot,
}

/// Normalizes absolute paths against a fixed project root.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    root: PathBuf,
}

impl PathPolicy {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into().clean(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Forward-slash path relative to the root, or `.` for the root itself.
    ///
    /// Paths outside the root start with `../`.
    pub fn normalize(&self, path: &Path) -> String {
        let parts = self.relative_parts(path);
        if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        }
    }

    pub fn classify_location(&self, path: &Path) -> Location {
        let parts = self.relative_parts(path);
        if parts.iter().any(|part| part == VENDOR_MARKER) {
            Location::External
        } else if parts.first().is_some_and(|part| part == "..") {
            Location::OutsideRoot
        } else {
            Location::Internal
        }
    }

    fn relative_parts(&self, path: &Path) -> Vec<String> {
        let path = path.clean();
        let mut root = self.root.components().peekable();
        let mut rest = path.components().peekable();

        while let (Some(a), Some(b)) = (root.peek(), rest.peek()) {
            if a != b {
                break;
            }
            root.next();
            rest.next();
        }

        let mut parts: Vec<String> = root
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|_| "..".to_string())
            .collect();
        parts.extend(
            rest.filter(|c| !matches!(c, Component::CurDir))
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
        parts
    }
}
