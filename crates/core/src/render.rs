//! Mermaid flowchart rendering.
//!
//! Node ids are `n1..nN` by position in the sorted node sequence, so
//! identical graphs always render to identical text.

use serde::{Deserialize, Serialize};

use crate::graph::Graph;

pub const HEADER: &str = "graph TD";

/// Optional wrapper around the diagram block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fence {
    /// Bare diagram text
    None,
    /// ```` ```mermaid ```` fenced block for markdown files
    #[default]
    Markdown,
}

/// Render without a fence.
pub fn render(graph: &Graph) -> String {
    render_with(graph, Fence::None)
}

pub fn render_with(graph: &Graph, fence: Fence) -> String {
    let mut lines = Vec::with_capacity(graph.node_count() + graph.edge_count() + 3);

    if fence == Fence::Markdown {
        lines.push("```mermaid".to_string());
    }
    lines.push(HEADER.to_string());

    for (i, label) in graph.nodes().iter().enumerate() {
        lines.push(format!("{}[\"{}\"]", node_id(i), escape(label)));
    }
    for edge in graph.edges() {
        // Endpoints are always nodes of a normalized graph.
        if let (Some(from), Some(to)) = (graph.position(&edge.from), graph.position(&edge.to)) {
            lines.push(format!("{} --> {}", node_id(from), node_id(to)));
        }
    }

    if fence == Fence::Markdown {
        lines.push("```".to_string());
    }
    lines.join("\n")
}

fn node_id(position: usize) -> String {
    format!("n{}", position + 1)
}

/// Double quotes would end the label early.
fn escape(label: &str) -> String {
    label.replace('"', "#quot;")
}
