//! Error types for every fallible stage of a run.
//!
//! Unresolvable imports are deliberately absent here: the builder drops them
//! silently unless strict resolution is switched on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while enumerating the module set.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot open project root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Failure while extracting import references from one module.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,
}

/// Failure while building a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Only raised when strict resolution is enabled.
    #[error("cannot resolve `{specifier}` imported from {from}")]
    Unresolved { from: PathBuf, specifier: String },
}

/// Failure while persisting rendered output.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any fatal condition that aborts an orchestrated run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
