//! End-of-run report.

use std::fmt;

use stencil_core::{Diagnostics, Message, Severity};

/// Summary of a session's diagnostics against its failure threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Every message, in the order produced.
    pub messages: Vec<Message>,
    /// Worst severity seen, if any message was produced.
    pub worst: Option<Severity>,
    /// Severity at or above which the run fails.
    pub threshold: Severity,
    /// Number of base instances the session produced.
    pub instances: usize,
}

impl Report {
    pub fn new(diagnostics: &Diagnostics, threshold: Severity, instances: usize) -> Self {
        Self {
            messages: diagnostics.iter().cloned().collect(),
            worst: diagnostics.worst(),
            threshold,
            instances,
        }
    }

    pub fn is_success(&self) -> bool {
        self.worst.map_or(true, |worst| worst < self.threshold)
    }

    /// Process exit code: 0 on success, 1 on failure.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Number of messages at exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{}", message)?;
        }
        let counts = [Severity::Fatal, Severity::Error, Severity::Warning, Severity::Info]
            .into_iter()
            .filter_map(|s| match self.count(s) {
                0 => None,
                n => Some(format!("{} {}", n, s)),
            })
            .collect::<Vec<_>>();
        if !counts.is_empty() {
            writeln!(f, "{}", counts.join(", "))?;
        }
        write!(
            f,
            "{} instance(s), {}",
            self.instances,
            if self.is_success() { "ok" } else { "failed" }
        )
    }
}
