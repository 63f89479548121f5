//! Error types for the scenario framework.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scenario runs.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur when running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to read a fixture.
    #[error("failed to read fixture '{path}': {source}")]
    FixtureRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No templates were given.
    #[error("no template fixtures for scenario '{scenario}'")]
    MissingTemplates { scenario: String },

    /// An expectation was not met.
    #[error("assertion failed at stage '{stage}': {message}")]
    AssertionFailed { stage: String, message: String },

    /// Session error.
    #[error("session error: {0}")]
    Session(#[from] stencil_session::SessionError),
}

impl ScenarioError {
    pub fn fixture_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FixtureRead {
            path: path.into(),
            source,
        }
    }

    pub fn missing_templates(scenario: impl Into<String>) -> Self {
        Self::MissingTemplates {
            scenario: scenario.into(),
        }
    }

    pub fn assertion_failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
