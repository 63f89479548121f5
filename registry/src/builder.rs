//! Builders for templates and instances.

use std::collections::HashSet;

use stencil_core::Term;

use crate::{
    Argument, ArgumentList, Instance, ListExpander, Parameter, RegistryError, RegistryResult,
    Signature, Template,
};

/// Builder for a validated [`Template`].
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    iri: String,
    parameters: Vec<Parameter>,
    body: Option<Vec<Instance>>,
    base: bool,
}

impl TemplateBuilder {
    /// Start a template; without instances it builds a forward declaration.
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            parameters: Vec::new(),
            body: None,
            base: false,
        }
    }

    /// Add a parameter.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add several parameters.
    pub fn params(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Add an instance to the body.
    pub fn instance(mut self, instance: Instance) -> Self {
        self.body.get_or_insert_with(Vec::new).push(instance);
        self
    }

    /// Give the template an explicitly empty body.
    pub fn empty_body(mut self) -> Self {
        self.body.get_or_insert_with(Vec::new);
        self
    }

    /// Mark as a base template.
    pub fn base(mut self) -> Self {
        self.base = true;
        self
    }

    /// Validate and build.
    pub fn build(self) -> RegistryResult<Template> {
        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !param.term.is_variable() {
                return Err(RegistryError::parameter_not_variable(
                    &self.iri,
                    param.term.to_string(),
                ));
            }
            if !seen.insert(&param.term) {
                return Err(RegistryError::duplicate_parameter(
                    &self.iri,
                    param.term.to_string(),
                ));
            }
            if let Some(default) = &param.default {
                if default.has_variables() {
                    return Err(RegistryError::default_not_constant(
                        &self.iri,
                        param.term.to_string(),
                        default.to_string(),
                    ));
                }
            }
        }

        if self.base && self.body.is_some() {
            return Err(RegistryError::base_with_body(&self.iri));
        }
        for instance in self.body.iter().flatten() {
            instance.arguments().validate()?;
        }

        Ok(Template {
            signature: Signature {
                iri: self.iri,
                parameters: self.parameters,
                base: self.base,
            },
            body: self.body,
        })
    }
}

/// Builder for an [`Instance`].
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    template: String,
    arguments: Vec<Argument>,
    expander: ListExpander,
}

impl InstanceBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            arguments: Vec::new(),
            expander: ListExpander::None,
        }
    }

    /// Add a plain argument.
    pub fn arg(mut self, value: Term) -> Self {
        self.arguments.push(Argument::new(value));
        self
    }

    /// Add an argument marked for list expansion.
    pub fn expand(mut self, value: Term) -> Self {
        self.arguments.push(Argument::expanded(value));
        self
    }

    pub fn expander(mut self, expander: ListExpander) -> Self {
        self.expander = expander;
        self
    }

    pub fn build(self) -> Instance {
        Instance::with_arguments(
            self.template,
            ArgumentList::new(self.arguments, self.expander),
        )
    }
}

impl Instance {
    pub fn builder(template: impl Into<String>) -> InstanceBuilder {
        InstanceBuilder::new(template)
    }
}
