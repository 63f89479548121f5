//! Expander error types.

use stencil_core::{Message, Severity};
use stencil_registry::RegistryError;
use thiserror::Error;

/// Result type for expansion steps.
pub type ExpandResult<T> = Result<T, ExpandError>;

/// Errors that stop the expansion of one instance, or of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("Maximum expansion depth ({depth}) exceeded")]
    MaxDepthExceeded { depth: usize },

    #[error("Cannot expand: cyclic template dependencies between {}", .0.join(", "))]
    CyclicDependencies(Vec<String>),

    #[error("Reference to undefined template {0}")]
    UndefinedTemplate(String),

    #[error("Template {0} has no template body, only a signature")]
    DeclarationOnly(String),

    #[error("Wrong number of arguments to {template}: expected {expected}, got {actual}")]
    WrongArity {
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error("List expansion of instance of {template} failed: {source}")]
    ListExpansion {
        template: String,
        source: RegistryError,
    },

    #[error("Argument {index} of {template} ({value}) is incompatible with {expected}")]
    IncompatibleArgument {
        template: String,
        index: usize,
        value: String,
        expected: String,
    },

    #[error("Argument {index} of {template} is the blank node {value} but the parameter is non-blank")]
    BlankToNonBlank {
        template: String,
        index: usize,
        value: String,
    },
}

impl ExpandError {
    pub fn max_depth_exceeded(depth: usize) -> Self {
        Self::MaxDepthExceeded { depth }
    }

    pub fn cyclic_dependencies(iris: impl IntoIterator<Item = String>) -> Self {
        Self::CyclicDependencies(iris.into_iter().collect())
    }

    pub fn undefined_template(iri: impl Into<String>) -> Self {
        Self::UndefinedTemplate(iri.into())
    }

    pub fn declaration_only(iri: impl Into<String>) -> Self {
        Self::DeclarationOnly(iri.into())
    }

    pub fn wrong_arity(template: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::WrongArity {
            template: template.into(),
            expected,
            actual,
        }
    }

    pub fn list_expansion(template: impl Into<String>, source: RegistryError) -> Self {
        Self::ListExpansion {
            template: template.into(),
            source,
        }
    }

    /// Run-level failures are fatal; the rest fail a single instance.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MaxDepthExceeded { .. } | Self::CyclicDependencies(_) => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    pub fn into_message(self) -> Message {
        Message::new(self.severity(), self.to_string())
    }
}

impl From<ExpandError> for Message {
    fn from(e: ExpandError) -> Self {
        e.into_message()
    }
}
