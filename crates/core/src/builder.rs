//! Dependency graph construction.
//!
//! Traversal is depth-first over an explicit worklist. Each call to
//! [`GraphBuilder::build`] owns its own [`Traversal`] (visited set plus the
//! label graph), so separate builds never share state.
//!
//! References the resolver cannot follow are dropped without error. The
//! edge count is best effort, not a completeness guarantee; set
//! [`BuildOptions::strict`] to turn unresolved path specifiers into errors.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::error::GraphError;
use crate::graph::{Graph, LabelGraph};
use crate::label::Labeler;
use crate::module::ModuleId;
use crate::path_policy::Location;
use crate::resolve::{EdgeSource, ImportRef, ModuleResolver, Resolution};
use crate::scope::Scope;

/// Behavior switches for one builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep unresolved and vendored targets as leaf nodes labeled by their
    /// raw specifier.
    pub include_external: bool,
    /// Follow `import type` / `export type` references.
    pub include_type_only: bool,
    /// Fail on relative or root-absolute specifiers that do not resolve.
    pub strict: bool,
}

/// Per-build accumulator.
///
/// Visited membership is keyed by module identity, not label, so modules
/// whose labels collide are still each expanded exactly once.
#[derive(Debug, Default)]
struct Traversal {
    visited: HashSet<ModuleId>,
    graph: LabelGraph,
}

/// Where one reference leads after resolution and filtering.
enum Target {
    Skip,
    /// Terminal node that is never expanded.
    Leaf(String),
    Module(ModuleId, String),
}

pub struct GraphBuilder<'a> {
    labeler: &'a Labeler,
    scope: &'a Scope,
    source: &'a dyn EdgeSource,
    resolver: &'a dyn ModuleResolver,
    options: BuildOptions,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        labeler: &'a Labeler,
        scope: &'a Scope,
        source: &'a dyn EdgeSource,
        resolver: &'a dyn ModuleResolver,
    ) -> Self {
        Self {
            labeler,
            scope,
            source,
            resolver,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Build one graph rooted at `entries`.
    ///
    /// Every internal entry becomes a node whether or not it is in scope;
    /// only edge targets are scope-filtered. With `transitive` off, only
    /// the entries' own references are walked.
    pub fn build(&self, entries: &[ModuleId], transitive: bool) -> Result<Graph, GraphError> {
        let mut traversal = Traversal::default();

        for entry in entries {
            if traversal.visited.contains(entry) {
                continue;
            }
            if self.labeler.policy().classify_location(entry.as_path()) != Location::Internal {
                debug!(module = %entry, "skipping non-internal entry");
                continue;
            }
            self.walk(entry, transitive, &mut traversal)?;
        }

        Ok(traversal.graph.into_graph())
    }

    fn walk(
        &self,
        entry: &ModuleId,
        transitive: bool,
        traversal: &mut Traversal,
    ) -> Result<(), GraphError> {
        let mut pending = vec![entry.clone()];

        while let Some(module) = pending.pop() {
            if !traversal.visited.insert(module.clone()) {
                continue;
            }

            let from = self.labeler.label(module.as_path());
            traversal.graph.add_node(&from);
            trace!(module = %module, label = %from, "expanding module");

            let imports = match self.source.imports(&module) {
                Ok(imports) => imports,
                Err(err) => {
                    warn!(module = %module, %err, "cannot read imports; treating as leaf");
                    continue;
                }
            };

            for import in &imports {
                if import.type_only && !self.options.include_type_only {
                    continue;
                }
                match self.target(&module, import)? {
                    Target::Skip => {}
                    Target::Leaf(label) => {
                        traversal.graph.add_edge(&from, &label);
                    }
                    Target::Module(target, label) => {
                        traversal.graph.add_edge(&from, &label);
                        if transitive && !traversal.visited.contains(&target) {
                            pending.push(target);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn target(&self, from: &ModuleId, import: &ImportRef) -> Result<Target, GraphError> {
        let resolved = match self.resolver.resolve(from, &import.specifier) {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Unresolved => {
                if self.options.strict && import.is_path() {
                    return Err(GraphError::Unresolved {
                        from: from.as_path().to_path_buf(),
                        specifier: import.specifier.clone(),
                    });
                }
                return Ok(self.external(import));
            }
        };

        let policy = self.labeler.policy();
        match policy.classify_location(resolved.as_path()) {
            Location::External => Ok(self.external(import)),
            Location::OutsideRoot => {
                debug!(specifier = %import.specifier, target = %resolved, "target outside project root");
                Ok(Target::Skip)
            }
            Location::Internal => {
                let relative = policy.normalize(resolved.as_path());
                if !self.scope.in_scope(&relative) {
                    trace!(specifier = %import.specifier, %relative, "target out of scope");
                    return Ok(Target::Skip);
                }
                let label = self.labeler.label_relative(&relative);
                Ok(Target::Module(resolved, label))
            }
        }
    }

    fn external(&self, import: &ImportRef) -> Target {
        if self.options.include_external {
            Target::Leaf(import.specifier.clone())
        } else {
            trace!(specifier = %import.specifier, "dropping external reference");
            Target::Skip
        }
    }
}
