//! Run configuration.

use serde::{Deserialize, Deserializer};
use stencil_core::Severity;
use stencil_expander::MAX_DEPTH;

use crate::{SessionError, SessionResult};

/// Configuration for a session.
///
/// Readable from JSON; absent fields keep their defaults:
///
/// ```json
/// { "failOn": "warning", "check": false, "maxDepth": 64 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Lowest severity that fails the run and halts further stages.
    #[serde(deserialize_with = "severity")]
    pub fail_on: Severity,
    /// Run the static checker. When off, the expander checks arguments
    /// as it goes instead.
    pub check: bool,
    /// Deepest template nesting followed below one root.
    pub max_depth: usize,
    /// Expand independent roots in parallel.
    pub parallel: bool,
    /// Load the bundled standard library when the session starts.
    pub load_standard_library: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fail_on: Severity::Error,
            check: true,
            max_depth: MAX_DEPTH,
            parallel: true,
            load_standard_library: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(src: &str) -> SessionResult<Self> {
        serde_json::from_str(src).map_err(SessionError::invalid_settings)
    }

    pub fn with_fail_on(mut self, severity: Severity) -> Self {
        self.fail_on = severity;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_standard_library(mut self, load: bool) -> Self {
        self.load_standard_library = load;
        self
    }

    /// No standard library, sequential expansion. Deterministic blank node
    /// names make this the preset for tests.
    pub fn minimal() -> Self {
        Self {
            parallel: false,
            load_standard_library: false,
            ..Self::default()
        }
    }

    /// Fail on warnings too.
    pub fn strict() -> Self {
        Self {
            fail_on: Severity::Warning,
            ..Self::default()
        }
    }
}

fn severity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Severity, D::Error> {
    let label = String::deserialize(deserializer)?;
    Severity::from_label(&label)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown severity '{}'", label)))
}
