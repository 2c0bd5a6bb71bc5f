//! In-memory project for callers that already hold resolved import data.

use std::collections::{BTreeMap, HashMap};

use super::{EdgeSource, ImportKind, ImportRef, ModuleResolver, Resolution};
use crate::error::ParseError;
use crate::module::ModuleId;

/// Modules, their import references, and where each reference resolves.
///
/// Acts as both [`EdgeSource`] and [`ModuleResolver`]. References added
/// without a target resolve to [`Resolution::Unresolved`].
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    imports: BTreeMap<ModuleId, Vec<ImportRef>>,
    links: HashMap<(ModuleId, String), ModuleId>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module with no imports (idempotent).
    pub fn add_module(&mut self, module: impl Into<ModuleId>) -> &mut Self {
        self.imports.entry(module.into()).or_default();
        self
    }

    /// Register a reference from `from`, optionally resolved to `target`.
    pub fn add_ref(
        &mut self,
        from: impl Into<ModuleId>,
        import: ImportRef,
        target: Option<ModuleId>,
    ) -> &mut Self {
        let from = from.into();
        if let Some(target) = target {
            self.links
                .insert((from.clone(), import.specifier.clone()), target);
        }
        self.imports.entry(from).or_default().push(import);
        self
    }

    /// Static import of `specifier` from `from`, resolving to `target`.
    pub fn import(
        &mut self,
        from: impl Into<ModuleId>,
        specifier: &str,
        target: impl Into<ModuleId>,
    ) -> &mut Self {
        self.add_ref(
            from,
            ImportRef::new(specifier, ImportKind::Static),
            Some(target.into()),
        )
    }

    /// Static import that the resolver cannot follow.
    pub fn unresolved(&mut self, from: impl Into<ModuleId>, specifier: &str) -> &mut Self {
        self.add_ref(from, ImportRef::new(specifier, ImportKind::Static), None)
    }

    /// Registered modules in path order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.imports.keys()
    }
}

impl EdgeSource for MemoryProject {
    fn imports(&self, module: &ModuleId) -> Result<Vec<ImportRef>, ParseError> {
        Ok(self.imports.get(module).cloned().unwrap_or_default())
    }
}

impl ModuleResolver for MemoryProject {
    fn resolve(&self, from: &ModuleId, specifier: &str) -> Resolution {
        match self.links.get(&(from.clone(), specifier.to_string())) {
            Some(target) => Resolution::Resolved(target.clone()),
            None => Resolution::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_traits() {
        let mut project = MemoryProject::new();
        project
            .import("/p/src/a.ts", "./b", "/p/src/b.ts")
            .unresolved("/p/src/a.ts", "react")
            .add_module("/p/src/b.ts");

        let a = ModuleId::from("/p/src/a.ts");
        let imports = project.imports(&a).unwrap();
        assert_eq!(imports.len(), 2);
        assert_eq!(
            project.resolve(&a, "./b"),
            Resolution::Resolved(ModuleId::from("/p/src/b.ts"))
        );
        assert_eq!(project.resolve(&a, "react"), Resolution::Unresolved);
        assert_eq!(project.modules().count(), 2);
    }

    #[test]
    fn test_unknown_module_has_no_imports() {
        let project = MemoryProject::new();
        let imports = project.imports(&ModuleId::from("/p/src/x.ts")).unwrap();
        assert!(imports.is_empty());
    }
}
