use std::sync::Arc;

use parking_lot::RwLock;

use crate::snapshot::{Adjacency, GraphSnapshot, NodeMap};

/// Holds the current graph generation.
///
/// Readers take a cheap `Arc` clone under the read guard and search without
/// holding the lock. `replace` swaps the whole generation under the write
/// guard, so a reader observes either the old graph or the new one.
pub struct GraphStore {
    current: RwLock<Arc<GraphSnapshot>>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(GraphSnapshot::empty())),
        }
    }

    /// Installs a new generation and returns its number.
    pub fn replace(&self, nodes: NodeMap, adjacency: Adjacency) -> u64 {
        let mut current = self.current.write();
        let generation = current.generation() + 1;
        *current = Arc::new(GraphSnapshot::new(generation, nodes, adjacency));
        generation
    }

    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }
}
