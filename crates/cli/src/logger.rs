//! Logging setup for the CLI.
//!
//! Logs go to stderr so diagrams printed with `--stdout` stay clean.
//! Level precedence: `--verbose`, then `--quiet`, then `RUST_LOG`, then
//! `info` for the modgraph crates.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("modgraph_core=debug,modgraph=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("modgraph_core=info,modgraph=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // Ignore a second initialization (e.g. from tests).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
