use rusqlite::Connection;

use crate::errors::NavGraphError;

pub fn ensure_schema(conn: &Connection) -> Result<(), NavGraphError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS nodes (
            id     TEXT PRIMARY KEY,
            name   TEXT,
            type   TEXT NOT NULL,
            floor  INTEGER NOT NULL,
            x      INTEGER NOT NULL,
            y      INTEGER NOT NULL,
            access TEXT
        );
        CREATE TABLE IF NOT EXISTS edges (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            source TEXT NOT NULL,
            target TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS settings (
            setting_key   TEXT PRIMARY KEY,
            setting_value TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source);
        CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target);
        "#,
    )
    .map_err(|e| NavGraphError::schema(e.to_string()))?;
    Ok(())
}
