//! Expansion engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use stencil_core::{Diagnostics, Message, Outcome, Term, Type};
use stencil_registry::{Instance, ListExpander, Parameter, Template, TemplateStore};
use tracing::{debug, info};

use crate::error::{ExpandError, ExpandResult};
use crate::{Substitution, MAX_DEPTH};

/// The result of processing one pending instance.
enum Step {
    /// A finished base instance.
    Emit(Instance),
    /// Silently discarded.
    Drop,
    Fail(Message),
    /// Instances to process next, at the given depth.
    Children(Vec<Instance>, usize),
}

/// Expands instances over a read-only store.
///
/// Fresh blank node names come from a site counter shared by every expansion
/// this expander performs, so outputs of separate calls never share local
/// blank nodes. Expanders given the same counter through
/// [`Expander::with_sites`] share that guarantee.
pub struct Expander<'s> {
    store: &'s TemplateStore,
    sites: Arc<AtomicU64>,
    dropped: AtomicU64,
    max_depth: usize,
    checking: bool,
}

impl<'s> Expander<'s> {
    pub fn new(store: &'s TemplateStore) -> Self {
        Self {
            store,
            sites: Arc::new(AtomicU64::new(0)),
            dropped: AtomicU64::new(0),
            max_depth: MAX_DEPTH,
            checking: false,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Draw expansion sites from `sites` instead of a private counter.
    pub fn with_sites(mut self, sites: Arc<AtomicU64>) -> Self {
        self.sites = sites;
        self
    }

    /// Check every rewritten instance against its template's signature
    /// before recursing.
    pub fn with_checking(mut self, checking: bool) -> Self {
        self.checking = checking;
        self
    }

    pub fn store(&self) -> &'s TemplateStore {
        self.store
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of instances dropped for a missing required argument.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn next_site(&self) -> u64 {
        self.sites.fetch_add(1, Ordering::Relaxed)
    }

    fn refuse_cycles(&self) -> Option<Message> {
        let cyclic = self.store.detect_cycles();
        if cyclic.is_empty() {
            return None;
        }
        Some(ExpandError::cyclic_dependencies(cyclic).into_message())
    }

    // ==================== Instance Expansion ====================

    /// Lazily expand `roots` into base instances, one outcome per emitted
    /// instance or failure, in depth-first order.
    pub fn expand(&self, roots: &[Instance]) -> Expansion<'_, 's> {
        if let Some(message) = self.refuse_cycles() {
            return Expansion {
                expander: self,
                pending: Vec::new(),
                refused: Some(message),
            };
        }
        self.expansion(roots)
    }

    /// An expansion of `roots` over a store already known to be acyclic.
    fn expansion(&self, roots: &[Instance]) -> Expansion<'_, 's> {
        let pending = roots
            .iter()
            .enumerate()
            .rev()
            .map(|(root, instance)| Pending {
                instance: instance.map_terms(Term::interned),
                depth: 0,
                root,
            })
            .collect();
        Expansion {
            expander: self,
            pending,
            refused: None,
        }
    }

    /// Expand roots in parallel; the result matches [`Expander::expand`]
    /// up to the fresh blank node names.
    pub fn expand_parallel(&self, roots: &[Instance]) -> (Vec<Instance>, Diagnostics) {
        if let Some(message) = self.refuse_cycles() {
            return (Vec::new(), message.into());
        }

        let results = Mutex::new(Vec::with_capacity(roots.len()));
        roots.par_iter().enumerate().for_each(|(index, root)| {
            let (instances, diagnostics) = Outcome::gather(self.expansion(std::slice::from_ref(root)));
            results.lock().push((index, instances, diagnostics));
        });

        let mut results = results.into_inner();
        results.sort_by_key(|(index, _, _)| *index);

        let mut instances = Vec::new();
        let mut diagnostics = Diagnostics::new();
        for (_, found, messages) in results {
            instances.extend(found);
            diagnostics.merge(messages);
        }
        info!(
            roots = roots.len(),
            emitted = instances.len(),
            messages = diagnostics.len(),
            "expansion finished"
        );
        (instances, diagnostics)
    }

    fn step(&self, instance: Instance, depth: usize) -> Step {
        if depth > self.max_depth {
            return Step::Fail(ExpandError::max_depth_exceeded(self.max_depth).into_message());
        }
        let iri = instance.template();
        let callee = match self.resolve(&instance) {
            Ok(callee) => callee,
            Err(e) => return Step::Fail(e.into_message()),
        };
        if callee.is_declaration() {
            return Step::Fail(ExpandError::declaration_only(iri).into_message());
        }

        if let Some(index) = missing_required(callee, &instance) {
            debug!(template = %iri, index, "dropped instance with none at a required parameter");
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Step::Drop;
        }

        if has_list_expansion(&instance) {
            return match instance.expand_lists() {
                Ok(expanded) => Step::Children(expanded, depth),
                Err(e) => Step::Fail(ExpandError::list_expansion(iri, e).into_message()),
            };
        }

        if self.checking {
            if let Err(e) = check_arguments(callee, &instance) {
                return Step::Fail(e.into_message());
            }
        }

        if callee.is_base() {
            return Step::Emit(instance);
        }

        let site = self.next_site();
        let substitution = Substitution::bind(callee, instance.terms(), site);
        let body = callee
            .body()
            .iter()
            .map(|i| substitution.apply_instance(i))
            .collect();
        Step::Children(body, depth + 1)
    }

    /// Look up the template of `instance` and check the argument count.
    fn resolve(&self, instance: &Instance) -> ExpandResult<&'s Template> {
        let iri = instance.template();
        let template = self
            .store
            .get(iri)
            .ok_or_else(|| ExpandError::undefined_template(iri))?;
        if instance.argument_count() != template.parameter_count() {
            return Err(ExpandError::wrong_arity(
                iri,
                template.parameter_count(),
                instance.argument_count(),
            ));
        }
        Ok(template)
    }

    // ==================== Template Rewriting ====================

    /// Rewrite the body of `iri` down to base instances.
    ///
    /// Instances whose output depends on the values of the template's own
    /// parameters are kept as they are: list expansion of a parameter, and an
    /// optional parameter passed where `none` drops the instance or selects a
    /// default.
    pub fn expand_template(&self, iri: &str) -> Outcome<Template> {
        if let Some(message) = self.refuse_cycles() {
            return Outcome::failed(message);
        }
        let Some(template) = self.store.get(iri) else {
            return Outcome::failed(ExpandError::undefined_template(iri).into_message());
        };
        if template.body.is_none() {
            return Outcome::ok(template.clone());
        }

        let mut body = Vec::new();
        let mut diagnostics = Diagnostics::new();
        let mut pending: Vec<(Instance, usize)> =
            template.body().iter().rev().map(|i| (i.clone(), 0)).collect();
        while let Some((instance, depth)) = pending.pop() {
            match self.rewrite_step(template, instance, depth) {
                Step::Emit(instance) => body.push(instance),
                Step::Drop => {}
                Step::Fail(message) => diagnostics.push(message.with_template(iri)),
                Step::Children(children, depth) => {
                    pending.extend(children.into_iter().rev().map(|c| (c, depth)))
                }
            }
        }

        if diagnostics.has_errors() {
            return Outcome::from_parts(None, diagnostics);
        }
        debug!(template = %iri, instances = body.len(), "rewrote template body");
        Outcome::from_parts(
            Some(Template {
                signature: template.signature.clone(),
                body: Some(body),
            }),
            diagnostics,
        )
    }

    fn rewrite_step(&self, template: &Template, instance: Instance, depth: usize) -> Step {
        if depth > self.max_depth {
            return Step::Fail(ExpandError::max_depth_exceeded(self.max_depth).into_message());
        }
        let callee = match self.resolve(&instance) {
            Ok(callee) => callee,
            Err(e) => return Step::Fail(e.into_message()),
        };
        if callee.is_declaration() {
            return Step::Emit(instance);
        }
        if missing_required(callee, &instance).is_some() {
            return Step::Drop;
        }

        if has_list_expansion(&instance) {
            return match instance.expand_lists() {
                Ok(expanded) => Step::Children(expanded, depth),
                Err(e) if e.is_unbound() => Step::Emit(instance),
                Err(e) => Step::Fail(ExpandError::list_expansion(instance.template(), e).into_message()),
            };
        }

        if callee.is_base() || depends_on_absence(template, callee, &instance) {
            return Step::Emit(instance);
        }

        let site = self.next_site();
        let substitution = Substitution::bind(callee, instance.terms(), site);
        let body = callee
            .body()
            .iter()
            .map(|i| substitution.apply_instance(i))
            .collect();
        Step::Children(body, depth + 1)
    }

    /// Rewrite every user template; the standard library is shared as is.
    pub fn expand_all(&self) -> Outcome<TemplateStore> {
        if let Some(message) = self.refuse_cycles() {
            return Outcome::failed(message);
        }
        let mut store = self.store.without_user_templates();
        let mut diagnostics = Diagnostics::new();
        for template in self.store.user_templates() {
            let (rewritten, messages) = self.expand_template(template.iri()).into_parts();
            diagnostics.merge(messages);
            let rewritten = rewritten.unwrap_or_else(|| template.clone());
            if let Err(e) = store.register(rewritten) {
                diagnostics.push(Message::error(e.to_string()).with_template(template.iri()));
            }
        }
        info!(
            templates = store.all_user_template_iris().len(),
            messages = diagnostics.len(),
            "rewrote user templates"
        );
        Outcome::from_parts(Some(store), diagnostics)
    }
}

/// Position of a `none` argument bound to a parameter that needs a value.
fn missing_required(callee: &Template, instance: &Instance) -> Option<usize> {
    instance
        .arguments()
        .iter()
        .zip(callee.parameters())
        .position(|(a, p)| !a.list_expand && a.value.is_none() && p.is_required())
}

fn has_list_expansion(instance: &Instance) -> bool {
    instance.arguments().expander() != ListExpander::None || instance.arguments().has_expansion()
}

/// True if an optional parameter of `template` that may be `none` reaches a
/// position of `callee` where `none` changes the outcome.
fn depends_on_absence(template: &Template, callee: &Template, instance: &Instance) -> bool {
    let may_be_none = |term: &Term| {
        template
            .signature
            .position_of(term)
            .and_then(|i| template.signature.parameter(i))
            .is_some_and(|p| p.optional && p.default.is_none())
    };
    instance
        .terms()
        .zip(callee.parameters())
        .any(|(term, param)| may_be_none(term) && (param.is_required() || param.default.is_some()))
}

fn check_arguments(callee: &Template, instance: &Instance) -> ExpandResult<()> {
    for (index, (value, param)) in instance.terms().zip(callee.parameters()).enumerate() {
        if value.is_none() {
            continue;
        }
        let expected = Parameter::effective_type(param);
        if !Type::of(value).is_compatible_with(&expected) {
            return Err(ExpandError::IncompatibleArgument {
                template: callee.iri().to_string(),
                index,
                value: value.to_string(),
                expected: expected.to_string(),
            });
        }
        if param.non_blank && value.is_blank() {
            return Err(ExpandError::BlankToNonBlank {
                template: callee.iri().to_string(),
                index,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

struct Pending {
    instance: Instance,
    depth: usize,
    root: usize,
}

/// Lazy depth-first expansion of a batch of roots.
///
/// A fatal failure abandons the rest of its root; other roots continue.
pub struct Expansion<'e, 's> {
    expander: &'e Expander<'s>,
    pending: Vec<Pending>,
    refused: Option<Message>,
}

impl Iterator for Expansion<'_, '_> {
    type Item = Outcome<Instance>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(message) = self.refused.take() {
            return Some(Outcome::failed(message));
        }
        loop {
            let Pending {
                instance,
                depth,
                root,
            } = self.pending.pop()?;
            match self.expander.step(instance, depth) {
                Step::Emit(instance) => return Some(Outcome::ok(instance)),
                Step::Drop => {}
                Step::Fail(message) => {
                    if message.is_fatal() {
                        self.pending.retain(|p| p.root != root);
                    }
                    return Some(Outcome::failed(message));
                }
                Step::Children(children, depth) => {
                    self.pending.extend(
                        children
                            .into_iter()
                            .rev()
                            .map(|instance| Pending { instance, depth, root }),
                    );
                }
            }
        }
    }
}
