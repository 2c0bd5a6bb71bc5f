//! Graph data structures for module dependencies
//!
//! Traversal accumulates into a [`LabelGraph`] backed by
//! `petgraph::StableGraph`, keyed by label. Once traversal is done it is
//! frozen into a [`Graph`]: sorted nodes plus sorted, deduplicated edges,
//! which is the only shape the renderer accepts.

use std::collections::{BTreeSet, HashMap};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};

/// A directed dependency: `from` imports or re-exports from `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A normalized dependency graph.
///
/// Nodes are sorted by label, edges by `(from, to)`. Every edge endpoint
/// is a node and no edge is a self-loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<String>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a normalized graph from unordered parts.
    ///
    /// Duplicates collapse, self-edges are dropped, and edge endpoints
    /// missing from `nodes` are added.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = String>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut node_set: BTreeSet<String> = nodes.into_iter().collect();
        let edge_set: BTreeSet<Edge> = edges.into_iter().filter(|e| e.from != e.to).collect();
        for edge in &edge_set {
            node_set.insert(edge.from.clone());
            node_set.insert(edge.to.clone());
        }

        Self {
            nodes: node_set.into_iter().collect(),
            edges: edge_set.into_iter().collect(),
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a label in the sorted node sequence.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.nodes
            .binary_search_by(|node| node.as_str().cmp(label))
            .ok()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edges
            .binary_search_by(|e| (e.from.as_str(), e.to.as_str()).cmp(&(from, to)))
            .is_ok()
    }
}

/// Mutable label graph used while traversing.
///
/// Nodes are deduplicated by label and edges by endpoint pair, so the
/// same import reached twice, or through different syntaxes, is one edge.
#[derive(Debug, Default)]
pub struct LabelGraph {
    inner: StableGraph<String, ()>,
    /// Label to index, avoiding a linear scan per insertion
    index: HashMap<String, NodeIndex>,
}

impl LabelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning the existing index when the label is known.
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.inner.add_node(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    /// Add a deduplicated edge. Returns `false` for self-edges, which are
    /// never stored.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let a = self.add_node(from);
        let b = self.add_node(to);
        self.inner.update_edge(a, b, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Freeze into the sorted form.
    pub fn into_graph(self) -> Graph {
        let edges: Vec<Edge> = self
            .inner
            .edge_references()
            .map(|e| Edge::new(&self.inner[e.source()], &self.inner[e.target()]))
            .collect();
        let nodes = self.inner.node_indices().map(|idx| self.inner[idx].clone());
        Graph::from_parts(nodes, edges)
    }
}
