//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while interpreting names and type expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Malformed type expression '{0}'")]
    MalformedType(String),

    #[error("Unknown prefix in '{0}'")]
    UnknownPrefix(String),
}

impl CoreError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType(name.into())
    }

    pub fn malformed_type(expr: impl Into<String>) -> Self {
        Self::MalformedType(expr.into())
    }

    pub fn unknown_prefix(name: impl Into<String>) -> Self {
        Self::UnknownPrefix(name.into())
    }
}
