//! Signatures, templates and instances.

use std::collections::BTreeSet;
use std::fmt;

use stencil_core::Term;

use crate::{ArgumentList, Parameter, RegistryResult};

/// A template name and its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub iri: String,
    pub parameters: Vec<Parameter>,
    /// Primitive templates are never expanded.
    pub base: bool,
}

impl Signature {
    pub fn new(iri: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            iri: iri.into(),
            parameters,
            base: false,
        }
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_base(&self) -> bool {
        self.base
    }

    pub fn parameter(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    /// Position of the parameter bound by `variable`.
    pub fn position_of(&self, variable: &Term) -> Option<usize> {
        self.parameters.iter().position(|p| &p.term == variable)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>[", self.iri)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, "]")
    }
}

/// A signature with an optional body.
///
/// A template without a body is either a base template or, when its
/// signature is not base, a forward declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub signature: Signature,
    pub body: Option<Vec<Instance>>,
}

impl Template {
    pub fn iri(&self) -> &str {
        &self.signature.iri
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.signature.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.signature.parameter_count()
    }

    pub fn is_base(&self) -> bool {
        self.signature.is_base()
    }

    /// A signature only, neither base nor with a body.
    pub fn is_declaration(&self) -> bool {
        !self.is_base() && self.body.is_none()
    }

    pub fn body(&self) -> &[Instance] {
        self.body.as_deref().unwrap_or(&[])
    }

    /// IRIs referenced directly from the body.
    pub fn dependencies(&self) -> BTreeSet<&str> {
        self.body().iter().map(|i| i.template()).collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)?;
        if self.is_base() {
            return write!(f, " :: BASE .");
        }
        match &self.body {
            None => write!(f, " ."),
            Some(body) => {
                write!(f, " :: {{")?;
                for (i, instance) in body.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}", instance)?;
                }
                write!(f, " }} .")
            }
        }
    }
}

/// A reference to a template with bound arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instance {
    template: String,
    arguments: ArgumentList,
}

impl Instance {
    pub fn new(template: impl Into<String>, terms: Vec<Term>) -> Self {
        Self::with_arguments(template, ArgumentList::from_terms(terms))
    }

    pub fn with_arguments(template: impl Into<String>, arguments: ArgumentList) -> Self {
        Self {
            template: template.into(),
            arguments,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn arguments(&self) -> &ArgumentList {
        &self.arguments
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.arguments.terms()
    }

    /// True if no argument contains a variable.
    pub fn is_ground(&self) -> bool {
        !self.terms().any(Term::has_variables)
    }

    /// The same instance with every term mapped through `f`.
    pub fn map_terms<F: FnMut(&Term) -> Term>(&self, f: F) -> Instance {
        Instance {
            template: self.template.clone(),
            arguments: self.arguments.map_terms(f),
        }
    }

    /// Apply the list expander; see [`ArgumentList::expand`].
    pub fn expand_lists(&self) -> RegistryResult<Vec<Instance>> {
        Ok(self
            .arguments
            .expand()?
            .into_iter()
            .map(|arguments| Instance::with_arguments(self.template.clone(), arguments))
            .collect())
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.has_expansion() {
            write!(f, "{} | ", self.arguments.expander())?;
        }
        write!(f, "<{}>{}", self.template, self.arguments)
    }
}
