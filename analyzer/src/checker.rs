//! Static checks over a template store.
//!
//! Every library and user template is checked; findings accumulate into one
//! [`Diagnostics`] value and checking never stops at the first problem.

use std::collections::BTreeSet;

use stencil_core::{Diagnostics, Severity, Term, Type};
use stencil_registry::{Instance, Parameter, Region, Template, TemplateStore};
use tracing::{debug, info};

use crate::inference::{term_type, TypeInference};
use crate::CheckError;

/// Check every non-builtin template in `store`.
pub fn check(store: &TemplateStore) -> Diagnostics {
    Checker::new(store).run()
}

/// Accumulating checker over a read-only store.
pub struct Checker<'s> {
    store: &'s TemplateStore,
    inference: TypeInference<'s>,
    diagnostics: Diagnostics,
}

impl<'s> Checker<'s> {
    pub fn new(store: &'s TemplateStore) -> Self {
        Self {
            store,
            inference: TypeInference::new(store),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run all checks and return the findings.
    pub fn run(mut self) -> Diagnostics {
        let store = self.store;
        let cyclic = store.detect_cycles();
        let mut checked = 0usize;
        for (template, region) in store.templates() {
            if region == Region::Builtin {
                continue;
            }
            self.check_template(template, cyclic.contains(template.iri()));
            checked += 1;
        }
        self.propagate_failures();

        info!(
            templates = checked,
            messages = self.diagnostics.len(),
            "check finished"
        );
        self.diagnostics
    }

    fn report(&mut self, template: &Template, error: CheckError) {
        debug!(template = %template.iri(), %error, "check finding");
        self.diagnostics.push(error.into_message(template.iri()));
    }

    // ==================== Template Checks ====================

    /// Check one template's signature and body.
    pub fn check_template(&mut self, template: &Template, cyclic: bool) {
        if cyclic {
            self.report(template, CheckError::CyclicDependency);
        }

        for param in template.parameters() {
            self.check_default(template, param);
        }

        if template.body.is_none() {
            return;
        }

        for param in template.parameters() {
            if !mentions(template, &param.term) {
                self.report(template, CheckError::UnusedParameter(param.term.to_string()));
            }
        }

        for variable in undefined_variables(template) {
            self.report(template, CheckError::UndefinedParameter(variable));
        }

        for instance in template.body() {
            self.check_instance(template, instance);
        }

        for param in template.parameters() {
            self.check_usages(template, param);
        }
    }

    fn check_default(&mut self, template: &Template, param: &Parameter) {
        let Some(default) = &param.default else {
            return;
        };
        let expected = param.effective_type();
        if !Type::of(default).is_compatible_with(&expected) {
            self.report(
                template,
                CheckError::IncompatibleDefault {
                    variable: param.term.to_string(),
                    default: default.to_string(),
                    expected: expected.to_string(),
                },
            );
        }
    }

    /// Consistency of the positions an untyped parameter is passed to.
    fn check_usages(&mut self, template: &Template, param: &Parameter) {
        let usages = self.inference.usages(template, &param.term);

        if param.declared.is_none() {
            let conflict = usages.iter().enumerate().find_map(|(i, first)| {
                usages[i + 1..]
                    .iter()
                    .find(|second| {
                        !first.ty.is_subtype_of(&second.ty) && !second.ty.is_subtype_of(&first.ty)
                    })
                    .map(|second| (first.ty.clone(), second.ty.clone()))
            });
            if let Some((first, second)) = conflict {
                self.report(
                    template,
                    CheckError::conflicting_types(&param.term, first, second),
                );
            }
        }

        if !param.non_blank && usages.iter().any(|u| u.non_blank) {
            self.report(
                template,
                CheckError::InconsistentNonBlank(param.term.to_string()),
            );
        }
    }

    // ==================== Instance Checks ====================

    fn check_instance(&mut self, template: &Template, instance: &Instance) {
        let store = self.store;
        let callee_iri = instance.template();

        if let Err(e) = instance.arguments().validate() {
            self.report(
                template,
                CheckError::InvalidListExpansion {
                    callee: callee_iri.to_string(),
                    reason: e.to_string(),
                },
            );
        }

        let Some(callee) = store.get(callee_iri) else {
            self.report(template, CheckError::UndefinedTemplate(callee_iri.to_string()));
            return;
        };
        if callee.is_declaration() {
            self.report(template, CheckError::DeclaredOnly(callee_iri.to_string()));
        }

        if instance.argument_count() != callee.parameter_count() {
            self.report(
                template,
                CheckError::WrongNumberOfArguments {
                    callee: callee_iri.to_string(),
                    expected: callee.parameter_count(),
                    actual: instance.argument_count(),
                },
            );
            return;
        }

        let expected_types = self
            .inference
            .parameter_types(callee_iri)
            .unwrap_or_else(|| callee.parameters().iter().map(Parameter::effective_type).collect());

        for (index, (argument, param)) in instance
            .arguments()
            .iter()
            .zip(callee.parameters())
            .enumerate()
        {
            let expected = &expected_types[index];
            let actual = term_type(&argument.value, template.parameters());

            if argument.list_expand {
                match actual {
                    Some(ty) if ty.is_list() => {
                        if let Some(inner) = ty.inner() {
                            if !inner.is_compatible_with(expected) {
                                self.report(
                                    template,
                                    CheckError::incompatible_argument(callee_iri, index, expected, inner),
                                );
                            }
                        }
                    }
                    Some(ty) if ty != Type::bot() => self.report(
                        template,
                        CheckError::NotAList {
                            callee: callee_iri.to_string(),
                            index,
                            actual: ty.to_string(),
                        },
                    ),
                    _ => {}
                }
            } else if let Some(ty) = actual {
                if !ty.is_compatible_with(expected) {
                    self.report(
                        template,
                        CheckError::incompatible_argument(callee_iri, index, expected, ty),
                    );
                }
            }

            if !argument.list_expand && argument.value.is_none() && param.is_required() {
                self.report(
                    template,
                    CheckError::MissingRequiredArgument {
                        callee: callee_iri.to_string(),
                        index,
                        parameter: param.term.to_string(),
                    },
                );
            }

            if param.non_blank {
                if let Some(blank) = constant_blank(&argument.value, argument.list_expand) {
                    self.report(
                        template,
                        CheckError::BlankToNonBlank {
                            callee: callee_iri.to_string(),
                            index,
                            argument: blank.to_string(),
                        },
                    );
                }
            }
        }
    }

    // ==================== Propagation ====================

    /// Mark every template that is not failing itself but depends on one
    /// that is.
    fn propagate_failures(&mut self) {
        let failing = self.diagnostics.templates_at_least(Severity::Error);
        if failing.is_empty() {
            return;
        }
        let store = self.store;
        for (template, region) in store.templates() {
            if region == Region::Builtin || failing.contains(template.iri()) {
                continue;
            }
            let dependencies = store.dependencies_of(template.iri());
            if let Some(culprit) = dependencies.iter().find(|d| failing.contains(*d))
            {
                self.report(template, CheckError::DependsOnFailing(culprit.clone()));
            }
        }
    }
}

/// The first constant blank node bound at a position, looking into the list
/// elements when the argument is expanded.
fn constant_blank(value: &Term, expanded: bool) -> Option<&Term> {
    if expanded {
        return value
            .as_list()
            .and_then(|items| items.iter().find(|t| t.is_blank() && !t.is_variable()));
    }
    (value.is_blank() && !value.is_variable()).then_some(value)
}

fn mentions(template: &Template, variable: &Term) -> bool {
    let mut found = false;
    for term in template.body().iter().flat_map(Instance::terms) {
        term.walk(&mut |t, _| found |= t == variable);
    }
    found
}

fn undefined_variables(template: &Template) -> BTreeSet<String> {
    let mut undefined = BTreeSet::new();
    for term in template.body().iter().flat_map(Instance::terms) {
        term.walk(&mut |t, _| {
            if t.is_variable() && template.signature.position_of(t).is_none() {
                undefined.insert(t.to_string());
            }
        });
    }
    undefined
}
