//! Scenario definition and builder.

use std::path::{Path, PathBuf};

use stencil_session::Settings;

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::ScenarioResult;
use crate::runner::Runner;

/// A complete test scenario.
///
/// Template fixtures are loaded in order, the store is checked, and the
/// instance fixture, if any, is expanded. Each stage has an optional
/// assertion.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    settings: Settings,
    /// Template fixtures, relative to the base path.
    templates: Vec<PathBuf>,
    /// Root instances fixture.
    instances: Option<PathBuf>,
    check: Option<Assertion>,
    expand: Option<Assertion>,
    /// Base path for resolving relative paths.
    base_path: PathBuf,
}

impl Scenario {
    /// Create a new scenario with minimal settings: no standard library,
    /// sequential expansion.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Settings::minimal(),
            templates: Vec::new(),
            instances: None,
            check: None,
            expand: None,
            base_path: fixtures_root(),
        }
    }

    /// Set the base path for resolving relative paths.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Load the bundled standard library before the fixtures.
    pub fn with_standard_library(mut self) -> Self {
        self.settings.load_standard_library = true;
        self
    }

    /// Add a template fixture (relative to fixtures/).
    pub fn templates(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates.push(path.into());
        self
    }

    /// Set the root instances fixture (relative to fixtures/).
    pub fn instances(mut self, path: impl Into<PathBuf>) -> Self {
        self.instances = Some(path.into());
        self
    }

    /// Assert on the diagnostics after checking.
    pub fn check<F>(mut self, assertion_fn: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.check = Some(assertion_fn(AssertionBuilder::new()).build());
        self
    }

    /// Assert on the expanded instances and the final diagnostics.
    pub fn expand<F>(mut self, assertion_fn: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.expand = Some(assertion_fn(AssertionBuilder::new()).build());
        self
    }

    /// Run the scenario and return the result.
    pub fn run(&self) -> ScenarioResult<()> {
        Runner::new(self).run()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run_settings(&self) -> &Settings {
        &self.settings
    }

    /// Template fixture paths (resolved).
    pub fn template_paths(&self) -> Vec<PathBuf> {
        self.templates.iter().map(|p| self.resolve_path(p)).collect()
    }

    /// Instance fixture path (resolved), if any.
    pub fn instances_path(&self) -> Option<PathBuf> {
        self.instances.as_ref().map(|p| self.resolve_path(p))
    }

    pub fn check_assertion(&self) -> Option<&Assertion> {
        self.check.as_ref()
    }

    pub fn expand_assertion(&self) -> Option<&Assertion> {
        self.expand.as_ref()
    }

    /// Resolve a path relative to the base path.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

/// The `fixtures/` directory of this crate.
fn fixtures_root() -> PathBuf {
    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => PathBuf::from(manifest_dir).join("fixtures"),
        Err(_) => PathBuf::from("tests/fixtures"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_builder() {
        let scenario = Scenario::new("test")
            .templates("level-1/optional/templates.json")
            .instances("level-1/optional/instances.json")
            .check(|a| a.passes())
            .expand(|a| a.count(2));

        assert_eq!(scenario.name(), "test");
        assert_eq!(scenario.template_paths().len(), 1);
        assert!(scenario.instances_path().is_some());
        assert!(scenario.check_assertion().is_some());
        assert!(!scenario.run_settings().load_standard_library);
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let scenario = Scenario::new("abs")
            .base_path("/base")
            .templates("/elsewhere/t.json")
            .instances("i.json");

        assert_eq!(scenario.template_paths(), vec![PathBuf::from("/elsewhere/t.json")]);
        assert_eq!(scenario.instances_path(), Some(PathBuf::from("/base/i.json")));
    }
}
