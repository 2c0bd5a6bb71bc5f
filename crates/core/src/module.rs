//! Module identity.

use std::fmt;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

/// Opaque identity of one source module: its absolute path.
///
/// Paths are lexically cleaned on construction so `src/a/../b.ts` and
/// `src/b.ts` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into().clean())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl From<PathBuf> for ModuleId {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ModuleId {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ModuleId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_after_cleaning() {
        let a = ModuleId::new("/proj/src/components/../pages/about.tsx");
        let b = ModuleId::from("/proj/src/pages/about.tsx");
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_is_path() {
        let id = ModuleId::from("/proj/src/main.tsx");
        assert_eq!(id.to_string(), "/proj/src/main.tsx");
    }
}
