//! Diagnostics.
//!
//! Every core operation returns its value together with the messages it
//! produced. Combining results always keeps the messages of every operand.

use std::collections::BTreeSet;
use std::fmt;

/// Severity of a message, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    /// The template or instance concerned is unusable.
    Error,
    /// The enclosing operation cannot continue.
    Fatal,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parse a label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Fatal,
        ]
        .into_iter()
        .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
    /// IRI of the template the message is about, if any.
    pub template: Option<String>,
}

impl Message {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            template: None,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    pub fn fatal(text: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, text)
    }

    /// Attach the template this message concerns.
    pub fn with_template(mut self, iri: impl Into<String>) -> Self {
        self.template = Some(iri.into());
        self
    }

    pub fn is_at_least(&self, severity: Severity) -> bool {
        self.severity >= severity
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)?;
        if let Some(iri) = &self.template {
            write!(f, " (in <{}>)", iri)?;
        }
        Ok(())
    }
}

/// An ordered collection of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<Message>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// The most severe level present.
    pub fn worst(&self) -> Option<Severity> {
        self.messages.iter().map(|m| m.severity).max()
    }

    pub fn has_fatal(&self) -> bool {
        self.messages.iter().any(Message::is_fatal)
    }

    /// True if any message is an error or fatal.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.is_at_least(Severity::Error))
    }

    /// Messages at or above a severity.
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.is_at_least(severity))
    }

    /// Whether these messages fail a run whose threshold is `threshold`.
    pub fn fails(&self, threshold: Severity) -> bool {
        self.worst().is_some_and(|worst| worst >= threshold)
    }

    /// Templates with at least one message at or above `severity`.
    pub fn templates_at_least(&self, severity: Severity) -> BTreeSet<String> {
        self.at_least(severity)
            .filter_map(|m| m.template.clone())
            .collect()
    }

    /// True if some message text contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }
}

impl From<Message> for Diagnostics {
    fn from(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

impl Extend<Message> for Diagnostics {
    fn extend<I: IntoIterator<Item = Message>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

impl FromIterator<Message> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// A possibly absent value with the messages produced computing it.
///
/// A fatal outcome never carries a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    value: Option<T>,
    diagnostics: Diagnostics,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            diagnostics: Diagnostics::new(),
        }
    }

    /// An absent value explained by `message`.
    pub fn failed(message: Message) -> Self {
        Self {
            value: None,
            diagnostics: message.into(),
        }
    }

    pub fn from_parts(value: Option<T>, diagnostics: Diagnostics) -> Self {
        let value = if diagnostics.has_fatal() { None } else { value };
        Self { value, diagnostics }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.push(message);
        self
    }

    pub fn push(&mut self, message: Message) {
        if message.is_fatal() {
            self.value = None;
        }
        self.diagnostics.push(message);
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_fatal(&self) -> bool {
        self.diagnostics.has_fatal()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Option<T>, Diagnostics) {
        (self.value, self.diagnostics)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            value: self.value.map(f),
            diagnostics: self.diagnostics,
        }
    }

    /// Chain a computation; messages of both steps are kept in order.
    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        let Outcome { value, mut diagnostics } = self;
        match value {
            Some(v) => {
                let (next, more) = f(v).into_parts();
                diagnostics.merge(more);
                Outcome::from_parts(next, diagnostics)
            }
            None => Outcome {
                value: None,
                diagnostics,
            },
        }
    }

    /// Combine two outcomes. The value is present only if both are.
    pub fn zip<U, R, F: FnOnce(T, U) -> R>(self, other: Outcome<U>, f: F) -> Outcome<R> {
        let (left, mut diagnostics) = self.into_parts();
        let (right, more) = other.into_parts();
        diagnostics.merge(more);
        let value = match (left, right) {
            (Some(l), Some(r)) => Some(f(l, r)),
            _ => None,
        };
        Outcome::from_parts(value, diagnostics)
    }

    /// All values, or none if any is absent; every message is kept.
    pub fn aggregate<I: IntoIterator<Item = Outcome<T>>>(outcomes: I) -> Outcome<Vec<T>> {
        let mut values = Some(Vec::new());
        let mut diagnostics = Diagnostics::new();
        for outcome in outcomes {
            let (value, more) = outcome.into_parts();
            diagnostics.merge(more);
            match (value, values.as_mut()) {
                (Some(v), Some(vs)) => vs.push(v),
                _ => values = None,
            }
        }
        Outcome::from_parts(values, diagnostics)
    }

    /// The present values and every message, dropping absent items.
    pub fn gather<I: IntoIterator<Item = Outcome<T>>>(outcomes: I) -> (Vec<T>, Diagnostics) {
        let mut values = Vec::new();
        let mut diagnostics = Diagnostics::new();
        for outcome in outcomes {
            let (value, more) = outcome.into_parts();
            diagnostics.merge(more);
            values.extend(value);
        }
        (values, diagnostics)
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::ok(value),
            Err(e) => Outcome::failed(Message::error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_from_label() {
        assert_eq!(Severity::from_label("warning"), Some(Severity::Warning));
        assert_eq!(Severity::from_label("FATAL"), Some(Severity::Fatal));
        assert_eq!(Severity::from_label("loud"), None);
    }

    #[test]
    fn test_diagnostics_worst_and_threshold() {
        // GIVEN
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Message::info("loaded"));
        diagnostics.push(Message::warning("unused parameter"));

        // THEN - warnings pass the default threshold
        assert_eq!(diagnostics.worst(), Some(Severity::Warning));
        assert!(!diagnostics.fails(Severity::Error));
        assert!(diagnostics.fails(Severity::Warning));

        // WHEN
        diagnostics.push(Message::error("bad").with_template("http://example.com/T"));

        // THEN
        assert!(diagnostics.fails(Severity::Error));
        assert!(diagnostics
            .templates_at_least(Severity::Error)
            .contains("http://example.com/T"));
    }

    #[test]
    fn test_zip_keeps_messages_of_both_sides() {
        // GIVEN
        let left = Outcome::ok(1).with_message(Message::warning("left"));
        let right: Outcome<i32> = Outcome::failed(Message::error("right"));

        // WHEN
        let zipped = left.zip(right, |a, b| a + b);

        // THEN
        assert!(!zipped.is_present());
        let texts: Vec<_> = zipped.diagnostics().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "right"]);
    }

    #[test]
    fn test_and_then_accumulates() {
        let outcome = Outcome::ok(2)
            .with_message(Message::info("first"))
            .and_then(|v| Outcome::ok(v * 2).with_message(Message::info("second")));

        assert_eq!(outcome.value(), Some(&4));
        assert_eq!(outcome.diagnostics().len(), 2);
    }

    #[test]
    fn test_fatal_outcome_has_no_value() {
        let outcome = Outcome::ok("x").with_message(Message::fatal("cycle"));

        assert!(outcome.is_fatal());
        assert_eq!(outcome.value(), None);
    }

    #[test]
    fn test_aggregate_and_gather() {
        let items = || {
            vec![
                Outcome::ok(1),
                Outcome::failed(Message::error("broken")),
                Outcome::ok(3),
            ]
        };

        let all = Outcome::aggregate(items());
        assert!(!all.is_present());
        assert_eq!(all.diagnostics().len(), 1);

        let (values, diagnostics) = Outcome::gather(items());
        assert_eq!(values, vec![1, 3]);
        assert!(diagnostics.has_errors());
    }
}
