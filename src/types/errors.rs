use thiserror::Error;

// === StorageError ===

/// Errors raised by a key-value storage adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying store rejected or failed the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// A stored value could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

// === RepositoryError ===

/// Errors related to tag and bookmark repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record exists for the given id (including dangling tag references).
    #[error("Not found: {0}")]
    NotFound(String),
    /// The storage adapter failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A stored record or index could not be decoded.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

impl RepositoryError {
    /// Returns `true` when the error is a Not-Found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

// === ConnectorError ===

/// Errors related to media metadata connectors.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The URL does not match the connector's expected pattern.
    #[error("URL not supported: {0}")]
    UnsupportedUrl(String),
    /// Transport failure while talking to the provider.
    #[error("Provider network error: {0}")]
    Network(String),
    /// The provider answered with a body of unexpected shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    /// The provider rejected the request or reported a failure.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConnectorError::MalformedResponse(err.to_string())
        } else {
            ConnectorError::Network(err.to_string())
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AppError ===

/// Errors surfaced by the application context and its composite operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
