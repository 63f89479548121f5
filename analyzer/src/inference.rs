//! Parameter type inference.
//!
//! An untyped parameter takes the least upper bound of the types of the
//! positions its variable is passed to in the body. Callee positions are
//! themselves inferred, recursively down to base templates.

use std::collections::{HashMap, HashSet};

use stencil_core::{Term, Type};
use stencil_registry::{Parameter, Template, TemplateStore};

/// A position a variable is passed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    /// Type expected at the position, after unwrapping enclosing lists.
    pub ty: Type,
    /// Whether the position rejects blank nodes.
    pub non_blank: bool,
    pub callee: String,
    pub index: usize,
}

/// Memoized inference over a store.
pub struct TypeInference<'s> {
    store: &'s TemplateStore,
    cache: HashMap<String, Vec<Type>>,
    in_progress: HashSet<String>,
}

impl<'s> TypeInference<'s> {
    pub fn new(store: &'s TemplateStore) -> Self {
        Self {
            store,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Effective parameter types of `iri`, or `None` if it is undefined.
    pub fn parameter_types(&mut self, iri: &str) -> Option<Vec<Type>> {
        if let Some(types) = self.cache.get(iri) {
            return Some(types.clone());
        }
        let store = self.store;
        let template = store.get(iri)?;
        if template.body.is_none() || !self.in_progress.insert(iri.to_string()) {
            // Base templates, declarations and templates on a cycle keep their
            // declarations.
            return Some(template.parameters().iter().map(Parameter::effective_type).collect());
        }

        let mut types = Vec::with_capacity(template.parameter_count());
        for param in template.parameters() {
            let ty = match &param.declared {
                Some(declared) => declared.clone(),
                None => self
                    .usages(template, &param.term)
                    .into_iter()
                    .map(|u| u.ty)
                    .reduce(|acc, ty| acc.lub(&ty))
                    .unwrap_or_else(Type::top),
            };
            types.push(ty);
        }

        self.in_progress.remove(iri);
        self.cache.insert(iri.to_string(), types.clone());
        Some(types)
    }

    /// Every position `variable` is passed to in the body of `template`.
    pub fn usages(&mut self, template: &Template, variable: &Term) -> Vec<Usage> {
        let store = self.store;
        let mut usages = Vec::new();
        for instance in template.body() {
            let Some(callee_types) = self.parameter_types(instance.template()) else {
                continue;
            };
            let callee = store.get(instance.template());
            for (index, argument) in instance.arguments().iter().enumerate() {
                let Some(param_type) = callee_types.get(index) else {
                    continue;
                };
                let position_type = if argument.list_expand {
                    Type::list(param_type.clone())
                } else {
                    param_type.clone()
                };
                let non_blank = !argument.list_expand
                    && callee
                        .and_then(|c| c.signature.parameter(index))
                        .is_some_and(|p| p.non_blank);

                argument.value.walk(&mut |term, depth| {
                    if term != variable {
                        return;
                    }
                    if let Some(ty) = unwrap_lists(&position_type, depth) {
                        usages.push(Usage {
                            ty,
                            non_blank: non_blank && depth == 0,
                            callee: instance.template().to_string(),
                            index,
                        });
                    }
                });
            }
        }
        usages
    }
}

fn unwrap_lists(ty: &Type, depth: usize) -> Option<Type> {
    let mut ty = ty;
    for _ in 0..depth {
        ty = ty.inner()?;
    }
    Some(ty.clone())
}

/// Type of an argument term inside a template with `parameters`.
///
/// Variables take their parameter's declared type. Returns `None` when the
/// term mentions an untyped or unknown variable.
pub fn term_type(term: &Term, parameters: &[Parameter]) -> Option<Type> {
    if term.is_variable() {
        return parameters
            .iter()
            .find(|p| &p.term == term)
            .and_then(|p| p.declared.clone());
    }
    match term.as_list() {
        Some([]) => Some(Type::list(Type::bot())),
        Some(items) => {
            let mut inner = Type::bot();
            for item in items {
                inner = inner.lub(&term_type(item, parameters)?);
            }
            Some(Type::ne_list(inner))
        }
        None => Some(Type::of(term)),
    }
}
