//! ModGraph Core Library
//!
//! This library builds module dependency graphs for TypeScript/JavaScript
//! projects and renders them as deterministic Mermaid diagrams.

pub mod builder;
pub mod config;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod label;
pub mod module;
pub mod orchestrator;
pub mod parser;
pub mod path_policy;
pub mod render;
pub mod resolve;
pub mod scope;
pub mod sink;

// Re-export commonly used types
pub use builder::{BuildOptions, GraphBuilder};
pub use config::{Config, Mode};
pub use error::{ConfigError, DiscoveryError, GraphError, ParseError, RunError, SinkError};
pub use graph::{Edge, Graph};
pub use module::ModuleId;
pub use orchestrator::{Orchestrator, RunReport};
pub use render::{render, render_with, Fence};
