//! Template parameters.

use std::fmt;

use stencil_core::{Term, Type};

/// A formal parameter of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// The variable the parameter binds in the template body.
    pub term: Term,
    /// Declared type; `None` means untyped.
    pub declared: Option<Type>,
    /// Whether the parameter may be bound to `none`.
    pub optional: bool,
    /// Whether blank nodes are rejected as arguments.
    pub non_blank: bool,
    /// Value used when the argument is `none`.
    pub default: Option<Term>,
}

impl Parameter {
    pub fn new(term: Term) -> Self {
        Self {
            term,
            declared: None,
            optional: false,
            non_blank: false,
            default: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn non_blank(mut self) -> Self {
        self.non_blank = true;
        self
    }

    pub fn with_type(mut self, declared: Type) -> Self {
        self.declared = Some(declared);
        self
    }

    pub fn with_default(mut self, default: Term) -> Self {
        self.default = Some(default);
        self
    }

    /// The declared type, or `Top` for untyped parameters.
    pub fn effective_type(&self) -> Type {
        self.declared.clone().unwrap_or_else(Type::top)
    }

    /// True if every call site must bind a value.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.non_blank {
            write!(f, "!")?;
        }
        if self.optional {
            write!(f, "?")?;
        }
        if let Some(declared) = &self.declared {
            write!(f, "{} ", declared)?;
        }
        write!(f, "{}", self.term)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}
