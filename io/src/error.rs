//! Format error types.

use stencil_core::CoreError;
use stencil_registry::RegistryError;
use thiserror::Error;

use crate::{Kind, Operation};

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while reading or writing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Unknown format '{0}'")]
    UnknownFormat(String),

    #[error("Format '{format}' does not support {operation} of {kind}s")]
    Unsupported {
        format: String,
        operation: Operation,
        kind: Kind,
    },

    #[error("Cannot parse document: {0}")]
    Parse(String),

    #[error("Malformed term: {0}")]
    MalformedTerm(String),

    #[error("Malformed item {index}: {reason}")]
    MalformedItem { index: usize, reason: String },

    #[error("Unknown list expander '{0}'")]
    UnknownExpander(String),

    #[error("Cannot write document: {0}")]
    Write(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl FormatError {
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat(name.into())
    }

    pub fn unsupported(format: impl Into<String>, operation: Operation, kind: Kind) -> Self {
        Self::Unsupported {
            format: format.into(),
            operation,
            kind,
        }
    }

    pub fn parse(reason: impl ToString) -> Self {
        Self::Parse(reason.to_string())
    }

    pub fn malformed_term(reason: impl Into<String>) -> Self {
        Self::MalformedTerm(reason.into())
    }

    pub fn malformed_item(index: usize, reason: impl ToString) -> Self {
        Self::MalformedItem {
            index,
            reason: reason.to_string(),
        }
    }

    pub fn write(reason: impl ToString) -> Self {
        Self::Write(reason.to_string())
    }
}
