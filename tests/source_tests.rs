use std::sync::Arc;

use floorgraph::{
    EdgeRecord, GraphSource, GraphStore, NavGraphError, NodeRecord, ReloadCoordinator,
    SqliteSource,
};

fn seeded(path: &std::path::Path) -> SqliteSource {
    let source = SqliteSource::open(path).expect("source");
    for node in [
        NodeRecord::new("R-102", 1, 10, 0, "room", Some("employee")),
        NodeRecord::new("H-1", 1, 0, 0, "hallway", None),
        NodeRecord::new("E-1", 1, 0, 10, "elevator", Some("all")),
    ] {
        source.insert_node(&node).unwrap();
    }
    source.insert_edge(&EdgeRecord::new("H-1", "R-102")).unwrap();
    source.insert_edge(&EdgeRecord::new("E-1", "H-1")).unwrap();
    source
}

#[test]
fn fetches_rows_in_stable_order() {
    let dir = tempfile::tempdir().unwrap();
    let source = seeded(&dir.path().join("map.db"));
    let nodes = source.fetch_nodes().unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["E-1", "H-1", "R-102"]);
    assert_eq!(nodes[1].access, None);
    assert_eq!(nodes[2].access.as_deref(), Some("employee"));

    let edges = source.fetch_edges().unwrap();
    assert_eq!(
        edges,
        vec![EdgeRecord::new("H-1", "R-102"), EdgeRecord::new("E-1", "H-1")]
    );
}

#[test]
fn read_only_open_sees_existing_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.db");
    drop(seeded(&path));
    let reader = SqliteSource::open_read_only(&path).unwrap();
    assert_eq!(reader.fetch_nodes().unwrap().len(), 3);
    assert!(
        reader
            .insert_node(&NodeRecord::new("X", 1, 0, 0, "room", None))
            .is_err()
    );
}

#[test]
fn read_only_open_fails_for_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let err = SqliteSource::open_read_only(dir.path().join("absent.db")).unwrap_err();
    assert!(matches!(err, NavGraphError::ConnectionError(_)));
}

#[test]
fn map_version_round_trips_through_settings() {
    let source = SqliteSource::open_in_memory().unwrap();
    assert_eq!(source.map_version().unwrap(), None);
    source.set_map_version(3).unwrap();
    source.set_map_version(4).unwrap();
    assert_eq!(source.map_version().unwrap(), Some(4));
}

#[test]
fn non_numeric_map_version_is_a_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.db");
    let source = SqliteSource::open(&path).unwrap();
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute(
            "INSERT INTO settings(setting_key, setting_value) VALUES('map_version', 'v2')",
            [],
        )
        .unwrap();
    assert!(matches!(
        source.map_version(),
        Err(NavGraphError::QueryError(_))
    ));
}

#[test]
fn malformed_node_row_fails_the_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.db");
    let source = seeded(&path);
    let coordinator = ReloadCoordinator::new(Arc::new(GraphStore::new()));
    coordinator.reload(&source).unwrap();

    rusqlite::Connection::open(&path)
        .unwrap()
        .execute(
            "INSERT INTO nodes(id, type, floor, x, y) VALUES('bad', 'room', 'upstairs', 0, 0)",
            [],
        )
        .unwrap();
    assert!(matches!(
        source.fetch_nodes(),
        Err(NavGraphError::QueryError(_))
    ));
    assert!(coordinator.reload(&source).is_err());
    assert_eq!(coordinator.store().snapshot().node_count(), 3);
}

#[test]
fn blank_records_are_rejected_before_insert() {
    let source = SqliteSource::open_in_memory().unwrap();
    let err = source
        .insert_node(&NodeRecord::new(" ", 1, 0, 0, "room", None))
        .unwrap_err();
    assert!(matches!(err, NavGraphError::InvalidInput(_)));
    let err = source.insert_edge(&EdgeRecord::new("A", "")).unwrap_err();
    assert!(matches!(err, NavGraphError::InvalidInput(_)));
}

#[test]
fn database_without_settings_table_is_unversioned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE nodes (id TEXT PRIMARY KEY, name TEXT, type TEXT NOT NULL,
                 floor INTEGER NOT NULL, x INTEGER NOT NULL, y INTEGER NOT NULL, access TEXT);
             CREATE TABLE edges (id INTEGER PRIMARY KEY AUTOINCREMENT,
                 source TEXT NOT NULL, target TEXT NOT NULL);
             INSERT INTO nodes(id, type, floor, x, y) VALUES('A', 'room', 1, 0, 0);",
        )
        .unwrap();

    let source = SqliteSource::open_read_only(&path).unwrap();
    assert_eq!(source.map_version().unwrap(), None);

    let coordinator = ReloadCoordinator::new(Arc::new(GraphStore::new()));
    assert!(coordinator.reload_if_stale(&source).unwrap().is_some());
    assert!(coordinator.reload_if_stale(&source).unwrap().is_some());
    assert_eq!(coordinator.store().generation(), 2);
    assert_eq!(coordinator.store().snapshot().node_count(), 1);
}
