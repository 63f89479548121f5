//! Parameter bindings for one expansion site.

use std::collections::HashMap;

use stencil_core::{BlankNode, Term};
use stencil_registry::{Instance, Template};

/// A mapping from body terms to the terms replacing them.
///
/// Holds the parameter bindings of one expansion site together with the
/// fresh names given to the body's local blank nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    map: HashMap<Term, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the parameters of `template` to `arguments` at expansion `site`.
    ///
    /// A `none` argument for a parameter with a default takes the default.
    /// Every body blank node and every variable that is not a parameter is
    /// renamed to a blank node unique to `site`.
    pub fn bind<'a>(
        template: &Template,
        arguments: impl IntoIterator<Item = &'a Term>,
        site: u64,
    ) -> Self {
        let mut substitution = Self::new();
        for (param, argument) in template.parameters().iter().zip(arguments) {
            let value = match &param.default {
                Some(default) if argument.is_none() => fresh(default, site).unwrap_or_else(|| default.clone()),
                _ => argument.clone(),
            };
            substitution.insert(param.term.clone(), value);
        }

        for term in template.body().iter().flat_map(Instance::terms) {
            term.walk(&mut |t, _| {
                if substitution.contains(t) {
                    return;
                }
                if let Some(renamed) = fresh(t, site) {
                    substitution.insert(t.clone(), renamed);
                }
            });
        }
        substitution
    }

    pub fn insert(&mut self, from: Term, to: Term) {
        self.map.insert(from, to);
    }

    pub fn get(&self, term: &Term) -> Option<&Term> {
        self.map.get(term)
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.map.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &Term)> {
        self.map.iter()
    }

    /// Replace every bound subterm of `term`.
    pub fn apply(&self, term: &Term) -> Term {
        term.map(&|t| self.get(t).cloned())
    }

    pub fn apply_instance(&self, instance: &Instance) -> Instance {
        instance.map_terms(|t| self.apply(t))
    }
}

/// A site-unique blank node for a local blank node or stray variable.
fn fresh(term: &Term, site: u64) -> Option<Term> {
    if let Some(blank) = term.as_blank() {
        return Some(Term::from(blank.fresh(site)));
    }
    if term.is_variable() && !term.is_list() {
        let label = term
            .as_iri()
            .and_then(|iri| iri.rsplit(['/', '#']).next())
            .filter(|name| !name.is_empty())
            .unwrap_or("var");
        return Some(Term::from(BlankNode::new(label).fresh(site)));
    }
    None
}
