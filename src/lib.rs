//! Role-aware shortest paths over a multi-floor indoor graph loaded from SQLite.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod bench_utils;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod http;
pub mod model;
pub mod reload;
pub mod safety;
pub mod schema;
pub mod search;
pub mod service;
pub mod snapshot;
pub mod source;
pub mod store;

pub use crate::errors::NavGraphError;
pub use crate::model::{Access, EdgeRecord, Node, NodeKind, NodeRecord, Role};
pub use crate::reload::{ReloadCoordinator, ReloadReport};
pub use crate::search::{Route, find_route, shortest_path};
pub use crate::service::{NavService, PathRequest, PathResponse};
pub use crate::snapshot::{GraphBuilder, GraphSnapshot};
pub use crate::source::{GraphSource, SqliteSource};
pub use crate::store::GraphStore;
