use thiserror::Error;

/// Failures surfaced by the map source, the loader and the service configuration.
///
/// Path queries never produce one of these: an unreachable or unknown node is a
/// `None` route, not an error.
#[derive(Debug, Error)]
pub enum NavGraphError {
    #[error("map database unavailable: {0}")]
    ConnectionError(String),
    #[error("map schema error: {0}")]
    SchemaError(String),
    #[error("map query failed: {0}")]
    QueryError(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl NavGraphError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        NavGraphError::ConnectionError(msg.into())
    }

    pub fn schema<T: Into<String>>(msg: T) -> Self {
        NavGraphError::SchemaError(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        NavGraphError::QueryError(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        NavGraphError::InvalidInput(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        NavGraphError::ConfigError(msg.into())
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NavGraphError::ConnectionError(_) | NavGraphError::QueryError(_)
        )
    }
}
