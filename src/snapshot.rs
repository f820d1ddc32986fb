//! Immutable graph generations and the builder that assembles them from source rows.

use ahash::AHashMap;

use crate::model::{EdgeRecord, Node, NodeRecord};

pub type NodeMap = AHashMap<String, Node>;
pub type Adjacency = AHashMap<String, Vec<String>>;

/// One internally consistent version of the building graph.
///
/// A snapshot is never mutated after construction; reloads produce a new one.
#[derive(Debug, Default)]
pub struct GraphSnapshot {
    generation: u64,
    nodes: NodeMap,
    adjacency: Adjacency,
}

impl GraphSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(generation: u64, nodes: NodeMap, adjacency: Adjacency) -> Self {
        Self {
            generation,
            nodes,
            adjacency,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Neighbors of `id` in ascending identifier order; empty for unknown ids.
    pub fn neighbors(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        undirected_edge_count(&self.adjacency)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes sorted by identifier.
    pub fn nodes_sorted(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }
}

/// Parts of a snapshot built outside the live store.
#[derive(Debug, Default)]
pub struct BuiltGraph {
    pub nodes: NodeMap,
    pub adjacency: Adjacency,
    pub dropped_edges: usize,
}

impl BuiltGraph {
    /// Number of undirected edges that survived the build.
    pub fn edge_count(&self) -> usize {
        undirected_edge_count(&self.adjacency)
    }
}

// every edge is stored once per endpoint
fn undirected_edge_count(adjacency: &Adjacency) -> usize {
    adjacency.values().map(Vec::len).sum::<usize>() / 2
}

/// Accumulates rows into a node map and an undirected adjacency map.
///
/// Nodes must be added before the edges that reference them. Edges with an
/// unknown endpoint, and self-loops, are dropped and counted.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: NodeMap,
    adjacency: Adjacency,
    dropped_edges: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: AHashMap::with_capacity(nodes),
            adjacency: AHashMap::with_capacity(nodes),
            dropped_edges: 0,
        }
    }

    pub fn add_node(&mut self, record: NodeRecord) {
        let node = record.into_node();
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_edge(&mut self, edge: &EdgeRecord) -> bool {
        let known = self.nodes.contains_key(&edge.source) && self.nodes.contains_key(&edge.target);
        if !known || edge.source == edge.target {
            self.dropped_edges += 1;
            return false;
        }
        self.adjacency
            .entry(edge.source.clone())
            .or_default()
            .push(edge.target.clone());
        self.adjacency
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
        true
    }

    pub fn finish(mut self) -> BuiltGraph {
        for neighbors in self.adjacency.values_mut() {
            neighbors.sort();
            neighbors.dedup();
        }
        BuiltGraph {
            nodes: self.nodes,
            adjacency: self.adjacency,
            dropped_edges: self.dropped_edges,
        }
    }

    pub fn from_records(nodes: Vec<NodeRecord>, edges: &[EdgeRecord]) -> BuiltGraph {
        let mut builder = Self::with_capacity(nodes.len());
        for record in nodes {
            builder.add_node(record);
        }
        for edge in edges {
            builder.add_edge(edge);
        }
        builder.finish()
    }
}
