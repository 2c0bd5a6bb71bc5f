//! Run orchestration: enumerate, build, render, write.
//!
//! Project mode builds a single graph with every in-scope module as a
//! root and writes it to one file. Entries mode builds an independent
//! graph per entry module, writes `<slug>.md` for each, and finishes with
//! an `index.md` manifest listing them in discovery order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::builder::GraphBuilder;
use crate::config::{Config, Mode};
use crate::discovery::ModuleSet;
use crate::error::RunError;
use crate::label::Labeler;
use crate::module::ModuleId;
use crate::parser::Parser;
use crate::path_policy::{Location, PathPolicy};
use crate::render::render_with;
use crate::resolve::{EdgeSource, FsResolver, ModuleResolver, TsConfig};
use crate::sink::OutputSink;

pub const MANIFEST_FILE: &str = "index.md";
pub const MANIFEST_HEADER: &str = "# Screen Dependency Graphs";

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: Mode,
    /// Graphs built: 1 in project mode, one per entry otherwise.
    pub graphs: usize,
    /// Everything written, manifest last.
    pub outputs: Vec<PathBuf>,
}

impl RunReport {
    /// Entries mode found nothing to graph.
    pub fn is_empty(&self) -> bool {
        self.graphs == 0
    }
}

pub struct Orchestrator<'a> {
    config: &'a Config,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Discover modules on disk, parse them with tree-sitter, resolve
    /// through the filesystem, and write through `sink`.
    pub fn run(&self, sink: &mut dyn OutputSink) -> Result<RunReport, RunError> {
        let modules = ModuleSet::discover(
            &self.config.root,
            &self.config.scan_globs,
            self.config.include_declaration_only_modules,
        )?;
        let resolver = self.fs_resolver(modules.root());
        self.run_with(&modules, &Parser::new(), &resolver, sink)
    }

    /// Filesystem resolver with `tsconfig.json` path mapping merged under
    /// the configured aliases.
    pub fn fs_resolver(&self, root: &Path) -> FsResolver {
        let tsconfig = if self.config.use_tsconfig {
            TsConfig::load(root).unwrap_or_else(|err| {
                warn!(%err, "ignoring tsconfig path mapping");
                None
            })
        } else {
            None
        };

        let mut resolver = FsResolver::new(root);
        let mut aliases = BTreeMap::new();
        if let Some(tsconfig) = &tsconfig {
            aliases.extend(tsconfig.aliases());
            if let Some(base_url) = tsconfig.base_url() {
                resolver = resolver.with_base_url(base_url);
            }
            debug!(aliases = aliases.len(), "loaded tsconfig path mapping");
        }
        aliases.extend(self.config.aliases.clone());
        resolver.with_aliases(aliases)
    }

    /// Run over an existing module set with caller-supplied collaborators.
    pub fn run_with(
        &self,
        modules: &ModuleSet,
        source: &dyn EdgeSource,
        resolver: &dyn ModuleResolver,
        sink: &mut dyn OutputSink,
    ) -> Result<RunReport, RunError> {
        let labeler = Labeler::new(PathPolicy::new(modules.root()), self.config.source_root.clone());
        let scope = self.config.scope();
        let builder = GraphBuilder::new(&labeler, &scope, source, resolver)
            .with_options(self.config.build_options());

        match self.config.mode() {
            Mode::Project => self.run_project(modules, &labeler, &builder, sink),
            Mode::Entries => self.run_entries(modules, &labeler, &builder, sink),
        }
    }

    fn run_project(
        &self,
        modules: &ModuleSet,
        labeler: &Labeler,
        builder: &GraphBuilder<'_>,
        sink: &mut dyn OutputSink,
    ) -> Result<RunReport, RunError> {
        let scope = self.config.scope();
        let policy = labeler.policy();
        let roots: Vec<ModuleId> = modules
            .modules()
            .iter()
            .filter(|m| policy.classify_location(m.as_path()) == Location::Internal)
            .filter(|m| scope.in_scope(&policy.normalize(m.as_path())))
            .cloned()
            .collect();
        debug!(roots = roots.len(), "building project graph");

        let graph = builder.build(&roots, self.config.transitive())?;
        let output = self.config.output_path();
        sink.write(&output, &render_with(&graph, self.config.fence))?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            output = %output.display(),
            "project graph written"
        );
        Ok(RunReport {
            mode: Mode::Project,
            graphs: 1,
            outputs: vec![output],
        })
    }

    fn run_entries(
        &self,
        modules: &ModuleSet,
        labeler: &Labeler,
        builder: &GraphBuilder<'_>,
        sink: &mut dyn OutputSink,
    ) -> Result<RunReport, RunError> {
        let entries = modules.select(&self.config.entry_globs)?;
        if entries.is_empty() {
            warn!(
                globs = ?self.config.entry_globs,
                "no entry modules found; adjust entry_globs"
            );
            return Ok(RunReport {
                mode: Mode::Entries,
                graphs: 0,
                outputs: Vec::new(),
            });
        }

        let out_dir = self.config.output_path();
        let transitive = self.config.transitive();
        let mut manifest = vec![MANIFEST_HEADER.to_string(), String::new()];
        let mut outputs = Vec::with_capacity(entries.len() + 1);

        for entry in &entries {
            let relative = labeler.policy().normalize(entry.as_path());
            let slug = entry_slug(&relative, labeler.source_root());
            let file_name = format!("{slug}.md");

            let graph = builder.build(std::slice::from_ref(entry), transitive)?;
            let path = out_dir.join(&file_name);
            sink.write(&path, &render_with(&graph, self.config.fence))?;
            debug!(entry = %relative, nodes = graph.node_count(), "entry graph written");

            manifest.push(format!("- [{slug}]({file_name})"));
            outputs.push(path);
        }

        let manifest_path = out_dir.join(MANIFEST_FILE);
        sink.write(&manifest_path, &manifest.join("\n"))?;
        outputs.push(manifest_path);

        info!(entries = entries.len(), output = %out_dir.display(), "entry graphs written");
        Ok(RunReport {
            mode: Mode::Entries,
            graphs: entries.len(),
            outputs,
        })
    }
}

/// File-name-safe page-like name for an entry module.
///
/// `src/app/blog/[slug]/page.tsx` becomes `app__blog__[slug]`,
/// `src/pages/about.tsx` becomes `pages__about`; anything else keeps its
/// path minus the source root.
pub fn entry_slug(relative: &str, source_root: &str) -> String {
    let trimmed = relative.strip_prefix(source_root).unwrap_or(relative);
    let is_under = |area: &str| relative.starts_with(source_root) && trimmed.starts_with(area);

    let base = if is_under("app/") {
        Path::new(trimmed)
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default()
    } else if is_under("pages/") {
        strip_script_extension(trimmed).to_string()
    } else {
        trimmed.to_string()
    };

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-' | '[' | ']') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .replace('/', "__")
}

fn strip_script_extension(path: &str) -> &str {
    [".tsx", ".ts", ".jsx", ".js"]
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}
