//! Session error types.

use stencil_registry::RegistryError;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Settings could not be read.
    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },

    /// The standard library failed to load.
    #[error("standard library unavailable")]
    LibraryUnavailable,

    /// The store rejected a registration.
    #[error("store error: {0}")]
    Registry(#[from] RegistryError),
}

impl SessionError {
    pub fn invalid_settings(message: impl ToString) -> Self {
        Self::InvalidSettings {
            message: message.to_string(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
