use std::{thread, time::Duration};

use tracing::{info, warn};

use crate::{config::ServiceConfig, errors::NavGraphError, source::SqliteSource};

/// Opens the source of record read-only, retrying while it is not yet available.
pub fn connect_with_retry(config: &ServiceConfig) -> Result<SqliteSource, NavGraphError> {
    let path = config.database.clone();
    let source = retry(config.connect_attempts, config.retry_delay, || {
        SqliteSource::open_read_only(&path)
    })?;
    info!(path = %config.database.display(), "connected to map database");
    Ok(source)
}

/// Runs `op` up to `attempts` times, sleeping `delay` between transient failures, and
/// returns the last error once attempts are exhausted.
pub fn retry<T, F>(attempts: u32, delay: Duration, mut op: F) -> Result<T, NavGraphError>
where
    F: FnMut() -> Result<T, NavGraphError>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts && err.is_transient() => {
                warn!(attempt, attempts, error = %err, "map database not ready; retrying");
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
