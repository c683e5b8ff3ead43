//! Core error types for zenith-core.
//!
//! This module defines the error hierarchy using thiserror. Reads from the
//! event log never surface errors (they degrade to defaults); these types
//! cover writes, configuration, and the optional collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for zenith-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Focus coach errors
    #[error("Coach error: {0}")]
    Coach(#[from] CoachError),

    /// Camera errors
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Backing database is locked
    #[error("Store is locked")]
    Locked,

    /// A record could not be serialized before writing
    #[error("Failed to serialize record '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Focus coach errors.
///
/// `AuthorizationExpired` is the only kind that asks the user to re-link;
/// everything else is retried as-is.
#[derive(Error, Debug)]
pub enum CoachError {
    /// The linked credential was rejected by the provider
    #[error("Coach authorization expired; re-link your account")]
    AuthorizationExpired,

    /// No credential has been linked yet
    #[error("Coach account is not linked")]
    NotLinked,

    /// Non-success HTTP status
    #[error("Coach request failed: HTTP {status}")]
    Http { status: u16 },

    /// Network or client failure
    #[error("Coach transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body had no usable text
    #[error("Malformed coach response: {0}")]
    MalformedResponse(String),

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// Invalid endpoint configuration
    #[error("Invalid coach endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl CoachError {
    /// Whether the caller should prompt the user to re-link.
    pub fn is_authorization_expired(&self) -> bool {
        matches!(self, CoachError::AuthorizationExpired)
    }
}

/// Camera errors.
#[derive(Error, Debug)]
pub enum CameraError {
    /// Stream could not be acquired
    #[error("Camera access denied or unavailable.")]
    Unavailable,

    /// The stream was used after release
    #[error("Camera stream already released")]
    Released,

    /// Source produced a frame of the wrong size
    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration must be a positive number of minutes
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Launch delay outside the allowed set
    #[error("Launch delay must be one of 3, 5, 10, 15 seconds (got {0})")]
    InvalidLaunchDelay(u32),

    /// Unknown enumerated value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
