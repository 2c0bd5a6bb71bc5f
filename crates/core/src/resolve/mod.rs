//! Edge sources and module resolution.
//!
//! Static imports, re-exports and dynamic imports differ only in syntax.
//! An [`EdgeSource`] flattens all three into [`ImportRef`]s, and a
//! [`ModuleResolver`] maps each specifier to a module or reports it
//! unresolved. The builder runs one pipeline over the result.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::module::ModuleId;

pub mod fs;
pub mod memory;
pub mod tsconfig;

pub use fs::FsResolver;
pub use memory::MemoryProject;
pub use tsconfig::TsConfig;

/// Which syntax produced a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    /// `import ... from "x"` or `import "x"`
    Static,
    /// `export ... from "x"`
    ReExport,
    /// `import("x")`
    Dynamic,
}

/// One raw reference to another module, as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    pub specifier: String,
    pub kind: ImportKind,
    /// `import type` / `export type`; erased at compile time.
    #[serde(default)]
    pub type_only: bool,
}

impl ImportRef {
    pub fn new(specifier: impl Into<String>, kind: ImportKind) -> Self {
        Self {
            specifier: specifier.into(),
            kind,
            type_only: false,
        }
    }

    pub fn type_only(mut self) -> Self {
        self.type_only = true;
        self
    }

    /// Relative or root-absolute path specifier, as opposed to a package name.
    pub fn is_path(&self) -> bool {
        let s = self.specifier.as_str();
        s == "." || s == ".." || s.starts_with("./") || s.starts_with("../") || s.starts_with('/')
    }
}

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ModuleId),
    Unresolved,
}

/// Yields every import reference of a module, regardless of syntax.
pub trait EdgeSource {
    fn imports(&self, module: &ModuleId) -> Result<Vec<ImportRef>, ParseError>;
}

/// Maps `(importer, specifier)` to a concrete module.
pub trait ModuleResolver {
    fn resolve(&self, from: &ModuleId, specifier: &str) -> Resolution;
}
