//! Error types for neonnotes-core

use thiserror::Error;

use crate::gateway::ApiError;

/// Result type alias using neonnotes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in neonnotes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Backend call failed (network, validation, or generic rejection)
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Requested session transition is not allowed from the current state
    #[error("Invalid session transition: {0}")]
    SessionState(&'static str),

    /// Input rejected before reaching the network
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Durable session storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the backend error when this failure came from an API call.
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}
