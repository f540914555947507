use thiserror::Error;

/// Error type for repokit operations
#[derive(Debug, Error)]
pub enum RepoKitError {
    #[error("No default connection configured")]
    MissingDefaultConnection,

    #[error("Unknown connection: {0}")]
    UnknownConnection(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No table name set and no default table available")]
    MissingTable,

    #[error("No connection established")]
    NotConnected,
}

/// Result type alias for repokit operations
pub type Result<T> = std::result::Result<T, RepoKitError>;
