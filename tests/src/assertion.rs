//! Assertion types and builders for verifying stage results.

use stencil_core::{vocab, Diagnostics, Severity, Term, TermKind};
use stencil_registry::Instance;

use crate::error::{ScenarioError, ScenarioResult};

/// A triple pattern over the textual forms of terms.
///
/// IRIs match by IRI, literals by lexical form, blank nodes by label prefix
/// (`_:restriction` matches every fresh copy), and `"none"` matches `none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// What a stage produced.
#[derive(Debug, Clone, Copy)]
pub struct Observed<'a> {
    pub instances: &'a [Instance],
    pub diagnostics: &'a Diagnostics,
    pub threshold: Severity,
}

/// A complete assertion for a stage result.
#[derive(Debug, Default)]
pub struct Assertion {
    // Instance assertions
    pub count: Option<usize>,
    pub contains: Vec<Triple>,
    pub excludes_subjects: Vec<String>,
    pub predicate_counts: Vec<(String, usize)>,

    // Diagnostic assertions
    pub passes: Option<bool>,
    pub clean: bool,
    pub messages: Vec<(Severity, String)>,
    pub message_pattern: Option<String>,
}

impl Assertion {
    /// Create a new empty assertion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the assertion against what a stage observed.
    pub fn verify(&self, stage: &str, observed: &Observed<'_>) -> ScenarioResult<()> {
        let fail = |message: String| Err(ScenarioError::assertion_failed(stage, message));
        let diagnostics = observed.diagnostics;

        if let Some(expected) = self.passes {
            let passed = !diagnostics.fails(observed.threshold);
            if passed != expected {
                return fail(format!(
                    "expected the run to {}, diagnostics: {:?}",
                    if expected { "pass" } else { "fail" },
                    diagnostics.all()
                ));
            }
        }

        if self.clean && diagnostics.fails(Severity::Warning) {
            return fail(format!("expected no warnings, got: {:?}", diagnostics.all()));
        }

        for (severity, needle) in &self.messages {
            let found = diagnostics
                .iter()
                .any(|m| m.severity == *severity && m.text.contains(needle.as_str()));
            if !found {
                return fail(format!(
                    "expected a {} message containing '{}', got: {:?}",
                    severity,
                    needle,
                    diagnostics.all()
                ));
            }
        }

        if let Some(pattern) = &self.message_pattern {
            let re = regex_lite::Regex::new(pattern)
                .map_err(|e| ScenarioError::assertion_failed(stage, format!("invalid regex pattern: {}", e)))?;
            if !diagnostics.iter().any(|m| re.is_match(&m.text)) {
                return fail(format!("expected a message matching '{}'", pattern));
            }
        }

        if let Some(expected) = self.count {
            if observed.instances.len() != expected {
                return fail(format!(
                    "expected {} instance(s), got {}: {}",
                    expected,
                    observed.instances.len(),
                    listing(observed.instances)
                ));
            }
        }

        for triple in &self.contains {
            if !observed.instances.iter().any(|i| matches_triple(i, triple)) {
                return fail(format!(
                    "expected triple {} {} {}, got: {}",
                    triple.subject,
                    triple.predicate,
                    triple.object,
                    listing(observed.instances)
                ));
            }
        }

        for subject in &self.excludes_subjects {
            let present = observed
                .instances
                .iter()
                .any(|i| i.terms().next().is_some_and(|t| term_matches(t, subject)));
            if present {
                return fail(format!("expected nothing about {}", subject));
            }
        }

        for (predicate, expected) in &self.predicate_counts {
            let found = observed
                .instances
                .iter()
                .filter(|i| i.terms().nth(1).is_some_and(|t| term_matches(t, predicate)))
                .count();
            if found != *expected {
                return fail(format!(
                    "expected {} triple(s) with predicate {}, got {}",
                    expected, predicate, found
                ));
            }
        }

        Ok(())
    }
}

fn listing(instances: &[Instance]) -> String {
    instances
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn matches_triple(instance: &Instance, triple: &Triple) -> bool {
    if instance.template() != vocab::TRIPLE && instance.template() != vocab::NULLABLE_TRIPLE {
        return false;
    }
    let terms: Vec<&Term> = instance.terms().collect();
    terms.len() == 3
        && term_matches(terms[0], &triple.subject)
        && term_matches(terms[1], &triple.predicate)
        && term_matches(terms[2], &triple.object)
}

fn term_matches(term: &Term, text: &str) -> bool {
    match term.kind() {
        TermKind::Iri(iri) => iri == text,
        TermKind::Literal(literal) => literal.lexical() == text,
        TermKind::Blank(_) => term.to_string().starts_with(text),
        TermKind::None => text == "none",
        TermKind::List(_) => term.to_string() == text,
    }
}

/// Builder for assertions.
#[derive(Debug, Default)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    /// Create a new assertion builder.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Instance Assertions ====================

    /// Assert exactly this many instances.
    pub fn count(mut self, n: usize) -> Self {
        self.assertion.count = Some(n);
        self
    }

    /// Assert no instances.
    pub fn empty(self) -> Self {
        self.count(0)
    }

    /// Assert a triple is among the instances.
    pub fn triple(
        mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        self.assertion.contains.push(Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        });
        self
    }

    /// Assert no instance has this subject.
    pub fn no_subject(mut self, subject: impl Into<String>) -> Self {
        self.assertion.excludes_subjects.push(subject.into());
        self
    }

    /// Assert how many instances use a predicate.
    pub fn predicate_count(mut self, predicate: impl Into<String>, n: usize) -> Self {
        self.assertion.predicate_counts.push((predicate.into(), n));
        self
    }

    // ==================== Diagnostic Assertions ====================

    /// Assert the diagnostics stay below the failure threshold.
    pub fn passes(mut self) -> Self {
        self.assertion.passes = Some(true);
        self
    }

    /// Assert the diagnostics reach the failure threshold.
    pub fn fails(mut self) -> Self {
        self.assertion.passes = Some(false);
        self
    }

    /// Assert nothing at warning or above.
    pub fn clean(mut self) -> Self {
        self.assertion.clean = true;
        self
    }

    pub fn warning(mut self, needle: impl Into<String>) -> Self {
        self.assertion.messages.push((Severity::Warning, needle.into()));
        self
    }

    pub fn error(mut self, needle: impl Into<String>) -> Self {
        self.assertion.messages.push((Severity::Error, needle.into()));
        self
    }

    pub fn fatal(mut self, needle: impl Into<String>) -> Self {
        self.assertion.messages.push((Severity::Fatal, needle.into()));
        self
    }

    /// Assert some message matches a regular expression.
    pub fn message_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.message_pattern = Some(pattern.into());
        self
    }

    /// Build the assertion.
    pub fn build(self) -> Assertion {
        self.assertion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::{Literal, Message};

    fn triple(s: &str, p: &str, o: Term) -> Instance {
        Instance::new(vocab::TRIPLE, vec![Term::iri(s), Term::iri(p), o])
    }

    #[test]
    fn test_triple_matching() {
        // GIVEN
        let instances = vec![
            triple("urn:a", vocab::RDF_TYPE, Term::iri("urn:C")),
            triple("urn:a", "urn:name", Term::literal(Literal::plain("A"))),
            triple("urn:b", "urn:p", Term::blank("restriction_4")),
        ];
        let diagnostics = Diagnostics::new();
        let observed = Observed {
            instances: &instances,
            diagnostics: &diagnostics,
            threshold: Severity::Error,
        };

        // WHEN
        let assertion = AssertionBuilder::new()
            .count(3)
            .triple("urn:a", vocab::RDF_TYPE, "urn:C")
            .triple("urn:a", "urn:name", "A")
            .triple("urn:b", "urn:p", "_:restriction")
            .no_subject("urn:z")
            .predicate_count(vocab::RDF_TYPE, 1)
            .passes()
            .clean()
            .build();

        // THEN
        assert!(assertion.verify("expand", &observed).is_ok());
    }

    #[test]
    fn test_missing_message_fails() {
        let diagnostics: Diagnostics = vec![Message::warning("unused parameter")].into_iter().collect();
        let observed = Observed {
            instances: &[],
            diagnostics: &diagnostics,
            threshold: Severity::Error,
        };

        let found = AssertionBuilder::new().warning("unused").passes().build();
        let missing = AssertionBuilder::new().error("unused").build();

        assert!(found.verify("check", &observed).is_ok());
        assert!(matches!(
            missing.verify("check", &observed),
            Err(ScenarioError::AssertionFailed { .. })
        ));
    }
}
