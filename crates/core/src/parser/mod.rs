//! Parser module for extracting import references from source files
//!
//! Uses tree-sitter grammars to find every place a module names another
//! module. Resolution of those names happens elsewhere (see
//! [`crate::resolve`]); this layer only reports what the source says.

use std::path::Path;

use crate::error::ParseError;
use crate::module::ModuleId;
use crate::resolve::{EdgeSource, ImportRef};

pub mod typescript;

/// Source dialects with distinct grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    /// TypeScript or JavaScript with JSX
    Tsx,
}

impl Dialect {
    /// Pick the grammar from a file extension. JSX-capable extensions use
    /// the TSX grammar, everything else the plain TypeScript one.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") | Some("jsx") => Dialect::Tsx,
            _ => Dialect::TypeScript,
        }
    }
}

/// Edge source that parses modules from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Parser
    }

    /// Read and parse a file, returning its import references in source order
    pub fn extract_imports(&self, path: &Path) -> Result<Vec<ImportRef>, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        typescript::parse_imports(&source, Dialect::for_path(path))
    }
}

impl EdgeSource for Parser {
    fn imports(&self, module: &ModuleId) -> Result<Vec<ImportRef>, ParseError> {
        self.extract_imports(module.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ImportKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dialect_for_path() {
        assert_eq!(Dialect::for_path(Path::new("a/b.tsx")), Dialect::Tsx);
        assert_eq!(Dialect::for_path(Path::new("a/b.jsx")), Dialect::Tsx);
        assert_eq!(Dialect::for_path(Path::new("a/b.ts")), Dialect::TypeScript);
        assert_eq!(Dialect::for_path(Path::new("a/b.d.ts")), Dialect::TypeScript);
    }

    #[test]
    fn test_extract_imports_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("App.tsx");
        fs::write(
            &path,
            "import { Card } from './Card';\nexport const App = () => <Card>hi</Card>;\n",
        )
        .unwrap();

        let imports = Parser::new()
            .imports(&ModuleId::new(&path))
            .unwrap();

        assert_eq!(imports, vec![ImportRef::new("./Card", ImportKind::Static)]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Parser::new()
            .extract_imports(&temp_dir.path().join("gone.ts"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Read { .. }));
    }
}
