//! The source of record that node and edge rows are loaded from.

use std::path::Path;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::{
    errors::NavGraphError,
    model::{EdgeRecord, NodeRecord, row_to_edge, row_to_node, validate_edge, validate_node},
    schema::ensure_schema,
};

pub const MAP_VERSION_KEY: &str = "map_version";

/// Read side of the external data source consumed on start-up and on every reload.
pub trait GraphSource {
    fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, NavGraphError>;
    fn fetch_edges(&self) -> Result<Vec<EdgeRecord>, NavGraphError>;

    /// Version stamp of the stored map, if the source tracks one.
    fn map_version(&self) -> Result<Option<i64>, NavGraphError> {
        Ok(None)
    }
}

#[derive(Debug)]
pub struct SqliteSource {
    conn: Mutex<Connection>,
}

impl SqliteSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NavGraphError> {
        let conn =
            Connection::open(path).map_err(|e| NavGraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, NavGraphError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| NavGraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens an existing database without creating it or touching its schema.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, NavGraphError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| NavGraphError::connection(e.to_string()))?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| NavGraphError::connection(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    pub fn insert_node(&self, record: &NodeRecord) -> Result<(), NavGraphError> {
        validate_node(record)?;
        self.connection()
            .execute(
                "INSERT INTO nodes(id, name, type, floor, x, y, access) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id.as_str(),
                    record.name.as_deref(),
                    record.kind.as_str(),
                    record.floor,
                    record.x,
                    record.y,
                    record.access.as_deref(),
                ],
            )
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        Ok(())
    }

    pub fn insert_edge(&self, edge: &EdgeRecord) -> Result<i64, NavGraphError> {
        validate_edge(edge)?;
        let conn = self.connection();
        conn.execute(
            "INSERT INTO edges(source, target) VALUES(?1, ?2)",
            params![edge.source.as_str(), edge.target.as_str()],
        )
        .map_err(|e| NavGraphError::query(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    pub fn set_map_version(&self, version: i64) -> Result<(), NavGraphError> {
        self.connection()
            .execute(
                "INSERT INTO settings(setting_key, setting_value) VALUES(?1, ?2)
                 ON CONFLICT(setting_key) DO UPDATE SET setting_value = excluded.setting_value",
                params![MAP_VERSION_KEY, version.to_string()],
            )
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        Ok(())
    }

    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl GraphSource for SqliteSource {
    fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, NavGraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare("SELECT id, name, type, floor, x, y, access FROM nodes ORDER BY id")
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map([], row_to_node)
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        let mut nodes = Vec::new();
        for row in rows {
            nodes.push(row.map_err(|e| NavGraphError::query(e.to_string()))?);
        }
        Ok(nodes)
    }

    fn fetch_edges(&self) -> Result<Vec<EdgeRecord>, NavGraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare("SELECT source, target FROM edges ORDER BY id")
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map([], row_to_edge)
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        let mut edges = Vec::new();
        for row in rows {
            edges.push(row.map_err(|e| NavGraphError::query(e.to_string()))?);
        }
        Ok(edges)
    }

    /// A database without a `settings` table is unversioned.
    fn map_version(&self) -> Result<Option<i64>, NavGraphError> {
        let conn = self.connection();
        let has_settings: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='settings')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        if !has_settings {
            return Ok(None);
        }
        let value: Option<String> = conn
            .query_row(
                "SELECT setting_value FROM settings WHERE setting_key=?1",
                params![MAP_VERSION_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| NavGraphError::query(e.to_string()))?;
        match value {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| NavGraphError::query(format!("map version is not a number: {raw}"))),
            None => Ok(None),
        }
    }
}
