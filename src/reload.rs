use std::{sync::Arc, time::Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    errors::NavGraphError,
    snapshot::GraphBuilder,
    source::GraphSource,
    store::GraphStore,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReloadReport {
    pub generation: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub dropped_edges: usize,
    pub map_version: Option<i64>,
    pub load_time_ms: f64,
}

/// Pulls a full node/edge set from a [`GraphSource`] and installs it as one generation.
///
/// Reloads are serialized. A failed fetch leaves the current generation in place.
pub struct ReloadCoordinator {
    store: Arc<GraphStore>,
    loaded_version: Mutex<Option<i64>>,
}

impl ReloadCoordinator {
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self {
            store,
            loaded_version: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// Map version of the last successful reload, if the source reported one.
    pub fn loaded_version(&self) -> Option<i64> {
        *self.loaded_version.lock()
    }

    pub fn reload(&self, source: &dyn GraphSource) -> Result<ReloadReport, NavGraphError> {
        let mut loaded = self.loaded_version.lock();
        let version = match source.map_version() {
            Ok(version) => version,
            Err(err) => {
                debug!(error = %err, "map version unavailable; reloading unversioned");
                None
            }
        };
        self.reload_locked(&mut loaded, source, version)
    }

    /// Reloads only when the source's map version differs from the one loaded last.
    /// Sources without a version are always reloaded.
    pub fn reload_if_stale(
        &self,
        source: &dyn GraphSource,
    ) -> Result<Option<ReloadReport>, NavGraphError> {
        let mut loaded = self.loaded_version.lock();
        let version = source.map_version()?;
        if version.is_some() && version == *loaded {
            debug!(?version, "graph is current");
            return Ok(None);
        }
        self.reload_locked(&mut loaded, source, version).map(Some)
    }

    // version is read before the rows so a save racing the fetch triggers another reload
    fn reload_locked(
        &self,
        loaded: &mut Option<i64>,
        source: &dyn GraphSource,
        version: Option<i64>,
    ) -> Result<ReloadReport, NavGraphError> {
        let started = Instant::now();
        let fetched = source
            .fetch_nodes()
            .and_then(|nodes| source.fetch_edges().map(|edges| (nodes, edges)));
        let (nodes, edges) = match fetched {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    error = %err,
                    generation = self.store.generation(),
                    "graph reload failed; keeping current generation"
                );
                return Err(err);
            }
        };

        let built = GraphBuilder::from_records(nodes, &edges);
        if built.dropped_edges > 0 {
            warn!(
                dropped = built.dropped_edges,
                "dropped edges with unknown endpoints or self-loops"
            );
        }
        let node_count = built.nodes.len();
        let edge_count = built.edge_count();
        let dropped_edges = built.dropped_edges;
        let generation = self.store.replace(built.nodes, built.adjacency);
        *loaded = version;

        let report = ReloadReport {
            generation,
            node_count,
            edge_count,
            dropped_edges,
            map_version: version,
            load_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        };
        info!(
            generation,
            nodes = node_count,
            edges = edge_count,
            map_version = ?version,
            load_time_ms = report.load_time_ms,
            "graph loaded"
        );
        Ok(report)
    }
}
