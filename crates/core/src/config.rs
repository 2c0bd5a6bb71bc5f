//! Run configuration.
//!
//! Loaded from a TOML file (`modgraph.toml` by default) and then
//! overridden field by field from the command line. Every field has a
//! default, so an empty file is a valid configuration.
//!
//! A component-centric setup graphing every page against its components:
//!
//! ```toml
//! entry_globs = ["src/pages/**/*.{ts,tsx}", "src/app/**/page.tsx"]
//! scope_prefixes = ["src/components/", "src/pages/", "src/app/", "app/"]
//!
//! [aliases]
//! "@/" = "src/"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::BuildOptions;
use crate::discovery::DEFAULT_SCAN_GLOBS;
use crate::error::ConfigError;
use crate::label::DEFAULT_SOURCE_ROOT;
use crate::render::Fence;
use crate::scope::Scope;

/// File name looked up in the project root when no config path is given.
pub const CONFIG_FILE: &str = "modgraph.toml";

/// Default output for whole-project mode.
pub const DEFAULT_PROJECT_OUTPUT: &str = "deps.md";

/// Default output directory for per-entry mode.
pub const DEFAULT_ENTRIES_OUTPUT: &str = "graphs/screens";

/// Run mode, which also fixes the output target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One graph over every in-scope module, written to a single file.
    Project,
    /// One graph per entry module, written to a directory with a manifest.
    Entries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Project root; relative paths resolve against the working directory.
    pub root: PathBuf,
    /// Unset: `entries` when `entry_globs` is non-empty, else `project`.
    pub mode: Option<Mode>,
    pub scan_globs: Vec<String>,
    pub entry_globs: Vec<String>,
    /// Empty: everything under `source_root` is in scope.
    pub scope_prefixes: Vec<String>,
    pub source_root: String,
    pub include_external: bool,
    pub include_declaration_only_modules: bool,
    pub include_type_only_imports: bool,
    /// Unset: on in entries mode, off in project mode.
    pub transitive: Option<bool>,
    pub strict: bool,
    /// Specifier prefix rewrites, e.g. `"@/" = "src/"`. These win over
    /// `tsconfig.json` paths with the same prefix.
    pub aliases: BTreeMap<String, String>,
    /// Read `baseUrl` and `paths` from `<root>/tsconfig.json`.
    pub use_tsconfig: bool,
    /// Relative to `root`.
    pub output: Option<PathBuf>,
    pub fence: Fence,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            mode: None,
            scan_globs: DEFAULT_SCAN_GLOBS.iter().map(|s| s.to_string()).collect(),
            entry_globs: Vec::new(),
            scope_prefixes: Vec::new(),
            source_root: DEFAULT_SOURCE_ROOT.to_string(),
            include_external: false,
            include_declaration_only_modules: false,
            include_type_only_imports: false,
            transitive: None,
            strict: false,
            aliases: BTreeMap::new(),
            use_tsconfig: true,
            output: None,
            fence: Fence::Markdown,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn mode(&self) -> Mode {
        match self.mode {
            Some(mode) => mode,
            None if self.entry_globs.is_empty() => Mode::Project,
            None => Mode::Entries,
        }
    }

    pub fn transitive(&self) -> bool {
        self.transitive.unwrap_or(self.mode() == Mode::Entries)
    }

    pub fn output_path(&self) -> PathBuf {
        match (&self.output, self.mode()) {
            (Some(path), _) => path.clone(),
            (None, Mode::Project) => PathBuf::from(DEFAULT_PROJECT_OUTPUT),
            (None, Mode::Entries) => PathBuf::from(DEFAULT_ENTRIES_OUTPUT),
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::from_config(&self.scope_prefixes, &self.source_root)
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            include_external: self.include_external,
            include_type_only: self.include_type_only_imports,
            strict: self.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mode(), Mode::Project);
        assert!(!config.transitive());
        assert_eq!(config.output_path(), PathBuf::from("deps.md"));
        assert_eq!(config.scope(), Scope::SourceRoot("src/".to_string()));
        assert!(config.use_tsconfig);
    }

    #[test]
    fn test_entry_globs_switch_mode() {
        let config: Config = toml::from_str(
            r#"
entry_globs = ["src/pages/**/*.{ts,tsx}", "!src/pages/**/_app.*"]
scope_prefixes = ["src/components/", "src/pages/"]
include_external = true

[aliases]
"@/" = "src/"
"#,
        )
        .unwrap();

        assert_eq!(config.mode(), Mode::Entries);
        assert!(config.transitive());
        assert_eq!(config.output_path(), PathBuf::from("graphs/screens"));
        assert_eq!(config.aliases.get("@/").map(String::as_str), Some("src/"));
        assert!(config.build_options().include_external);
        assert!(matches!(config.scope(), Scope::Prefixes(ref p) if p.len() == 2));
    }

    #[test]
    fn test_explicit_overrides_win() {
        let config: Config = toml::from_str(
            r#"
mode = "project"
transitive = true
output = "docs/graph.md"
fence = "none"
entry_globs = ["src/pages/*.tsx"]
"#,
        )
        .unwrap();

        assert_eq!(config.mode(), Mode::Project);
        assert!(config.transitive());
        assert_eq!(config.output_path(), PathBuf::from("docs/graph.md"));
        assert_eq!(config.fence, Fence::None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "transitiv = true\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
