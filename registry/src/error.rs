//! Registry error types.

use thiserror::Error;

use crate::ListExpander;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building or registering templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate template: {0}")]
    DuplicateTemplate(String),

    #[error("Template {0} collides with a standard library template")]
    CollidesWithStandardLibrary(String),

    #[error("Template {0} redefines a builtin base template")]
    RedefinesBuiltin(String),

    #[error("Standard library is already registered")]
    LibraryAlreadyRegistered,

    #[error("Duplicate parameter {variable} in template {template}")]
    DuplicateParameter { template: String, variable: String },

    #[error("Parameter {variable} of template {template} is not a variable")]
    ParameterNotVariable { template: String, variable: String },

    #[error("Default value {value} of parameter {variable} in template {template} is not constant")]
    DefaultNotConstant {
        template: String,
        variable: String,
        value: String,
    },

    #[error("Base template {0} cannot have a body")]
    BaseWithBody(String),

    #[error("Instance has list-expansion arguments but no list expander")]
    ExpanderMissing,

    #[error("Instance uses list expander {0} but has no argument to expand")]
    NothingToExpand(ListExpander),

    #[error("Argument {index} ({value}) is marked for list expansion but is not a list")]
    NotAList { index: usize, value: String },

    #[error("Argument {index} ({value}) is marked for list expansion but is not yet bound")]
    Unexpandable { index: usize, value: String },
}

impl RegistryError {
    pub fn duplicate_template(iri: impl Into<String>) -> Self {
        Self::DuplicateTemplate(iri.into())
    }

    pub fn collides_with_standard_library(iri: impl Into<String>) -> Self {
        Self::CollidesWithStandardLibrary(iri.into())
    }

    pub fn redefines_builtin(iri: impl Into<String>) -> Self {
        Self::RedefinesBuiltin(iri.into())
    }

    pub fn duplicate_parameter(template: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::DuplicateParameter {
            template: template.into(),
            variable: variable.into(),
        }
    }

    pub fn parameter_not_variable(
        template: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self::ParameterNotVariable {
            template: template.into(),
            variable: variable.into(),
        }
    }

    pub fn default_not_constant(
        template: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::DefaultNotConstant {
            template: template.into(),
            variable: variable.into(),
            value: value.into(),
        }
    }

    pub fn base_with_body(iri: impl Into<String>) -> Self {
        Self::BaseWithBody(iri.into())
    }

    pub fn not_a_list(index: usize, value: impl Into<String>) -> Self {
        Self::NotAList {
            index,
            value: value.into(),
        }
    }

    pub fn unexpandable(index: usize, value: impl Into<String>) -> Self {
        Self::Unexpandable {
            index,
            value: value.into(),
        }
    }

    /// True for list-expansion failures caused by arguments that are still
    /// variables; these resolve once the enclosing template is instantiated.
    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::Unexpandable { .. })
    }
}
