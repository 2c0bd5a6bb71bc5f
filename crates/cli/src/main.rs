use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use modgraph_core::config::CONFIG_FILE;
use modgraph_core::sink::{FsSink, OutputSink};
use modgraph_core::{Config, Fence, Mode, Orchestrator, RunError, SinkError};
use tracing::debug;

mod logger;

/// ModGraph - Module dependency graphs as Mermaid diagrams
#[derive(Parser)]
#[command(name = "modgraph")]
#[command(version)] // Auto-pull version from Cargo.toml
#[command(about = "Render TypeScript module dependencies as Mermaid graphs", long_about = None)]
struct Cli {
    /// Project root (defaults to the config value, then the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config file (defaults to modgraph.toml in the root, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Entry module pattern; repeat for more. Implies entries mode.
    #[arg(long = "entry")]
    entry_globs: Vec<String>,

    /// In-scope path prefix; repeat for more
    #[arg(long = "scope")]
    scope_prefixes: Vec<String>,

    /// Keep unresolved and vendored imports as leaf nodes
    #[arg(long)]
    include_external: bool,

    /// Scan `.d.ts` modules too
    #[arg(long)]
    include_dts: bool,

    /// Follow `import type` references
    #[arg(long)]
    include_type_only: bool,

    /// Recurse through resolved imports
    #[arg(long, overrides_with = "no_transitive")]
    transitive: bool,

    #[arg(long, overrides_with = "transitive")]
    no_transitive: bool,

    /// Fail on relative imports that do not resolve
    #[arg(long)]
    strict: bool,

    /// Ignore `baseUrl` and `paths` in tsconfig.json
    #[arg(long)]
    no_tsconfig: bool,

    /// Output file (project mode) or directory (entries mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print diagrams instead of writing files
    #[arg(long)]
    stdout: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Project,
    Entries,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Project => Mode::Project,
            ModeArg::Entries => Mode::Entries,
        }
    }
}

/// Prints each output to stdout instead of persisting it.
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), SinkError> {
        println!("%% {}\n{}\n", path.display(), contents);
        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    let mut fs_sink = FsSink::new(&config.root);
    let mut stdout_sink = StdoutSink;
    let sink: &mut dyn OutputSink = if cli.stdout {
        &mut stdout_sink
    } else {
        &mut fs_sink
    };

    let report = Orchestrator::new(&config).run(sink).map_err(|err| match err {
        RunError::Sink(err) => anyhow::Error::new(err).context("could not persist output"),
        RunError::Discovery(err) => anyhow::Error::new(err).context("could not enumerate modules"),
        RunError::Graph(err) => anyhow::Error::new(err).context("could not build graph"),
    })?;

    if cli.stdout {
        return Ok(());
    }
    match report.mode {
        Mode::Project => {
            if let Some(path) = report.outputs.first() {
                println!("Wrote dependency graph to {}", config.root.join(path).display());
            }
        }
        Mode::Entries if report.is_empty() => {
            println!("No entry modules matched; nothing written");
        }
        Mode::Entries => {
            println!(
                "Wrote {} entry graphs to {}/",
                report.graphs,
                config.root.join(config.output_path()).display()
            );
        }
    }
    Ok(())
}

/// Config file first, then command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let root_hint = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let default_path = root_hint.join(CONFIG_FILE);
            if default_path.is_file() {
                Config::load(&default_path)
                    .with_context(|| format!("loading {}", default_path.display()))?
            } else {
                Config::default()
            }
        }
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(mode) = cli.mode {
        config.mode = Some(mode.into());
    }
    if !cli.entry_globs.is_empty() {
        config.entry_globs = cli.entry_globs.clone();
    }
    if !cli.scope_prefixes.is_empty() {
        config.scope_prefixes = cli.scope_prefixes.clone();
    }
    config.include_external |= cli.include_external;
    config.include_declaration_only_modules |= cli.include_dts;
    config.include_type_only_imports |= cli.include_type_only;
    config.strict |= cli.strict;
    if cli.no_tsconfig {
        config.use_tsconfig = false;
    }
    if cli.transitive {
        config.transitive = Some(true);
    } else if cli.no_transitive {
        config.transitive = Some(false);
    }
    if let Some(output) = &cli.output {
        config.output = Some(output.clone());
    }
    if cli.stdout {
        config.fence = Fence::None;
    }

    debug!(?config, "effective configuration");
    Ok(config)
}
