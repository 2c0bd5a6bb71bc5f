//! Module discovery with gitignore-aware filtering
//!
//! Walks a project directory while respecting .gitignore, keeps the files
//! matching a list of glob patterns, and lets callers re-query that set
//! with narrower patterns (how entry modules are picked).
//!
//! Patterns starting with `!` exclude: `["**/*.{ts,tsx}", "!node_modules/**"]`.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::error::DiscoveryError;
use crate::module::ModuleId;

/// Default module-scan patterns.
pub const DEFAULT_SCAN_GLOBS: &[&str] = &["**/*.{ts,tsx}", "!node_modules/**"];

/// Suffix of declaration-only modules.
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Include/exclude glob pair built from `!`-prefixed pattern lists.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl GlobFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, DiscoveryError> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            match pattern.strip_prefix('!') {
                Some(negated) => exclude.add(compile(negated)?),
                None => include.add(compile(pattern)?),
            };
        }

        Ok(Self {
            include: include.build().map_err(|source| DiscoveryError::Glob {
                pattern: patterns_display(patterns),
                source,
            })?,
            exclude: exclude.build().map_err(|source| DiscoveryError::Glob {
                pattern: patterns_display(patterns),
                source,
            })?,
        })
    }

    /// True when a project-relative path matches an include and no exclude.
    pub fn is_match(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }
}

fn compile(pattern: &str) -> Result<globset::Glob, DiscoveryError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| DiscoveryError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

fn patterns_display<S: AsRef<str>>(patterns: &[S]) -> String {
    patterns
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The working set of modules for one run.
#[derive(Debug, Clone)]
pub struct ModuleSet {
    root: PathBuf,
    /// Sorted by path
    modules: Vec<ModuleId>,
}

impl ModuleSet {
    /// Discover modules under `root` matching `patterns`.
    ///
    /// The root is canonicalized so every returned identity is absolute.
    /// `.d.ts` files are dropped unless `include_declarations` is set.
    ///
    /// # Example
    /// ```no_run
    /// use modgraph_core::discovery::ModuleSet;
    ///
    /// let set = ModuleSet::discover(
    ///     std::path::Path::new("my_project"),
    ///     &["src/**/*.{ts,tsx}"],
    ///     false,
    /// ).unwrap();
    /// println!("Found {} modules", set.len());
    /// ```
    pub fn discover<S: AsRef<str>>(
        root: &Path,
        patterns: &[S],
        include_declarations: bool,
    ) -> Result<Self, DiscoveryError> {
        let canonical_root = root.canonicalize().map_err(|source| DiscoveryError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        let filter = GlobFilter::new(patterns)?;

        let mut modules = Vec::new();
        for result in build_walker(&canonical_root) {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    // Keep walking; one unreadable directory should not end the scan.
                    warn!(%err, "error walking directory");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Ok(rel_path) = entry.path().strip_prefix(&canonical_root) else {
                continue;
            };
            if !filter.is_match(rel_path) {
                continue;
            }
            if !include_declarations && is_declaration(entry.path()) {
                debug!(path = %rel_path.display(), "skipping declaration module");
                continue;
            }
            modules.push(ModuleId::new(entry.into_path()));
        }

        modules.sort();
        debug!(count = modules.len(), root = %canonical_root.display(), "discovered modules");

        Ok(Self {
            root: canonical_root,
            modules,
        })
    }

    /// Wrap an already known module list.
    pub fn from_modules(root: impl Into<PathBuf>, modules: impl IntoIterator<Item = ModuleId>) -> Self {
        let mut modules: Vec<ModuleId> = modules.into_iter().collect();
        modules.sort();
        modules.dedup();
        Self {
            root: root.into(),
            modules,
        }
    }

    /// Re-query this set with another pattern list, keeping path order.
    pub fn select<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<ModuleId>, DiscoveryError> {
        let filter = GlobFilter::new(patterns)?;
        Ok(self
            .modules
            .iter()
            .filter(|module| {
                module
                    .as_path()
                    .strip_prefix(&self.root)
                    .is_ok_and(|rel| filter.is_match(rel))
            })
            .cloned()
            .collect())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn is_declaration(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(DECLARATION_SUFFIX))
}

/// Build a WalkBuilder with proper ignore configuration
fn build_walker(root: &Path) -> ignore::Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(true)
        .git_exclude(true)
        .hidden(false)
        .parents(true); // Also check parent directories for .gitignore

    // Explicitly add .gitignore if it exists (needed outside a git checkout,
    // where WalkBuilder does not apply it on its own)
    let gitignore_path = root.join(".gitignore");
    if gitignore_path.exists() {
        if let Some(err) = builder.add_ignore(&gitignore_path) {
            warn!(%err, path = %gitignore_path.display(), "failed to load .gitignore");
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn discover_default(root: &Path) -> ModuleSet {
        ModuleSet::discover(root, DEFAULT_SCAN_GLOBS, false).unwrap()
    }

    #[test]
    fn test_discover_basic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        File::create(root.join("main.tsx")).unwrap();
        File::create(root.join("routes.ts")).unwrap();
        File::create(root.join("README.md")).unwrap();

        let set = discover_default(root);

        assert_eq!(set.len(), 2);
        assert!(set.modules().iter().all(|m| m.as_path().is_absolute()));
        assert!(set.modules()[0].as_path().ends_with("main.tsx"));
        assert!(set.modules()[1].as_path().ends_with("routes.ts"));
    }

    #[test]
    fn test_respect_gitignore() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let mut gitignore = File::create(root.join(".gitignore")).unwrap();
        gitignore.write_all(b"dist/\n").unwrap();

        fs::create_dir_all(root.join("dist")).unwrap();
        File::create(root.join("dist/bundle.ts")).unwrap();
        File::create(root.join("main.ts")).unwrap();

        let set = discover_default(root);

        assert_eq!(set.len(), 1);
        assert!(set.modules()[0].as_path().ends_with("main.ts"));
    }

    #[test]
    fn test_negated_patterns_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        File::create(root.join("node_modules/react/index.ts")).unwrap();
        File::create(root.join("src/app.tsx")).unwrap();
        File::create(root.join("src/app.test.tsx")).unwrap();

        let set = ModuleSet::discover(
            root,
            &["**/*.{ts,tsx}", "!node_modules/**", "!**/*.test.*"],
            false,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert!(set.modules()[0].as_path().ends_with("src/app.tsx"));
    }

    #[test]
    fn test_declaration_modules_toggle() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        File::create(root.join("env.d.ts")).unwrap();
        File::create(root.join("main.ts")).unwrap();

        assert_eq!(discover_default(root).len(), 1);
        assert_eq!(
            ModuleSet::discover(root, DEFAULT_SCAN_GLOBS, true).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_select_requeries_the_set() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/pages/blog")).unwrap();
        fs::create_dir_all(root.join("src/components")).unwrap();
        File::create(root.join("src/pages/about.tsx")).unwrap();
        File::create(root.join("src/pages/_app.tsx")).unwrap();
        File::create(root.join("src/pages/blog/post.tsx")).unwrap();
        File::create(root.join("src/components/Card.tsx")).unwrap();

        let set = discover_default(root);
        assert_eq!(set.len(), 4);

        let entries = set
            .select(&["src/pages/**/*.tsx", "!src/pages/**/_app.*"])
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].as_path().ends_with("src/pages/about.tsx"));
        assert!(entries[1].as_path().ends_with("src/pages/blog/post.tsx"));

        // Single star stops at a separator.
        let shallow = set.select(&["src/pages/*.tsx"]).unwrap();
        assert_eq!(shallow.len(), 2);
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ModuleSet::discover(temp_dir.path(), &["src/**/*.{ts"], false).unwrap_err();
        assert!(matches!(err, DiscoveryError::Glob { .. }));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err =
            ModuleSet::discover(&temp_dir.path().join("nope"), DEFAULT_SCAN_GLOBS, false).unwrap_err();
        assert!(matches!(err, DiscoveryError::Root { .. }));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let set = discover_default(temp_dir.path());
        assert!(set.is_empty());
    }
}
