//! Transport-independent entry points: path queries and reload triggers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::NavGraphError,
    model::Role,
    reload::{ReloadCoordinator, ReloadReport},
    search::{Route, find_route},
    source::GraphSource,
    store::GraphStore,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub role: String,
}

impl PathRequest {
    pub fn new(start: &str, end: &str, role: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            role: role.to_string(),
        }
    }
}

/// `path` is `None` (serialized as `null`) when no admissible route exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResponse {
    pub path: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    Refreshed,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub status: RefreshStatus,
}

impl RefreshResponse {
    fn from_outcome(ok: bool) -> Self {
        let status = if ok {
            RefreshStatus::Refreshed
        } else {
            RefreshStatus::Failed
        };
        Self { status }
    }

    pub fn is_success(&self) -> bool {
        self.status == RefreshStatus::Refreshed
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphStatus {
    pub generation: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub map_version: Option<i64>,
}

pub struct NavService<S> {
    source: S,
    coordinator: ReloadCoordinator,
}

impl<S> NavService<S> {
    /// Starts with an empty graph; every query yields no path until a reload succeeds.
    pub fn new(source: S) -> Self {
        Self {
            source,
            coordinator: ReloadCoordinator::new(Arc::new(GraphStore::new())),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        self.coordinator.store()
    }

    pub fn route(&self, start: &str, end: &str, role: Role) -> Option<Route> {
        let snapshot = self.store().snapshot();
        find_route(&snapshot, start, end, role)
    }

    pub fn find_path(&self, request: &PathRequest) -> PathResponse {
        let role = Role::parse(&request.role);
        let route = self.route(&request.start, &request.end, role);
        debug!(
            start = %request.start,
            end = %request.end,
            %role,
            found = route.is_some(),
            "path query"
        );
        PathResponse {
            path: route.map(|route| route.path),
        }
    }

    pub fn status(&self) -> GraphStatus {
        let snapshot = self.store().snapshot();
        GraphStatus {
            generation: snapshot.generation(),
            node_count: snapshot.node_count(),
            edge_count: snapshot.edge_count(),
            map_version: self.coordinator.loaded_version(),
        }
    }
}

impl<S: GraphSource> NavService<S> {
    pub fn reload(&self) -> Result<ReloadReport, NavGraphError> {
        self.coordinator.reload(&self.source)
    }

    pub fn reload_if_stale(&self) -> Result<Option<ReloadReport>, NavGraphError> {
        self.coordinator.reload_if_stale(&self.source)
    }

    /// Reload trigger. Failures are logged by the coordinator and reported as status only.
    pub fn refresh(&self) -> RefreshResponse {
        RefreshResponse::from_outcome(self.reload().is_ok())
    }

    /// Like [`refresh`](Self::refresh), but a current map version is left as loaded.
    pub fn refresh_if_stale(&self) -> RefreshResponse {
        let outcome = self.reload_if_stale();
        if let Err(err) = &outcome {
            warn!(error = %err, "map version check failed");
        }
        RefreshResponse::from_outcome(outcome.is_ok())
    }
}
