//! Checker findings.

use stencil_core::{Message, Severity};
use thiserror::Error;

/// A problem found while checking a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Reference to undefined template {0}")]
    UndefinedTemplate(String),

    #[error("Template {0} is only declared; its instances cannot be expanded")]
    DeclaredOnly(String),

    #[error("Wrong number of arguments to {callee}: expected {expected}, got {actual}")]
    WrongNumberOfArguments {
        callee: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {index} of {callee} has type {actual}, incompatible with {expected}")]
    IncompatibleArgument {
        callee: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Argument {index} of {callee} is marked for list expansion but has type {actual}")]
    NotAList {
        callee: String,
        index: usize,
        actual: String,
    },

    #[error("Argument {index} of {callee} is none but parameter {parameter} is required")]
    MissingRequiredArgument {
        callee: String,
        index: usize,
        parameter: String,
    },

    #[error("Argument {index} of {callee} is the blank node {argument} but the parameter is non-blank")]
    BlankToNonBlank {
        callee: String,
        index: usize,
        argument: String,
    },

    #[error("Variable {0} is used in the body but is not a parameter")]
    UndefinedParameter(String),

    #[error("Parameter {0} is not used in the body")]
    UnusedParameter(String),

    #[error("Parameter {variable} is used both as {first} and as {second}")]
    ConflictingParameterTypes {
        variable: String,
        first: String,
        second: String,
    },

    #[error("Parameter {0} is passed to a non-blank position and should be non-blank")]
    InconsistentNonBlank(String),

    #[error("Default {default} of parameter {variable} is incompatible with {expected}")]
    IncompatibleDefault {
        variable: String,
        default: String,
        expected: String,
    },

    #[error("Template is part of a dependency cycle")]
    CyclicDependency,

    #[error("Invalid list expansion in instance of {callee}: {reason}")]
    InvalidListExpansion { callee: String, reason: String },

    #[error("Template cannot be expanded: it depends on failing template {0}")]
    DependsOnFailing(String),
}

impl CheckError {
    pub fn severity(&self) -> Severity {
        match self {
            CheckError::DeclaredOnly(_)
            | CheckError::UnusedParameter(_)
            | CheckError::InconsistentNonBlank(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// A message attributed to `template`.
    pub fn into_message(self, template: &str) -> Message {
        Message::new(self.severity(), self.to_string()).with_template(template)
    }

    pub fn incompatible_argument(
        callee: impl Into<String>,
        index: usize,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::IncompatibleArgument {
            callee: callee.into(),
            index,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn conflicting_types(
        variable: impl ToString,
        first: impl ToString,
        second: impl ToString,
    ) -> Self {
        Self::ConflictingParameterTypes {
            variable: variable.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}
