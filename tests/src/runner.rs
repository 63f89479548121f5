//! Scenario runner.

use std::fs;
use std::path::Path;

use stencil_session::Session;

use crate::assertion::Observed;
use crate::error::{ScenarioError, ScenarioResult};
use crate::init_tracing;
use crate::scenario::Scenario;

/// Runs a scenario through a session.
pub struct Runner<'s> {
    scenario: &'s Scenario,
}

impl<'s> Runner<'s> {
    pub fn new(scenario: &'s Scenario) -> Self {
        Self { scenario }
    }

    /// Run the scenario.
    pub fn run(&self) -> ScenarioResult<()> {
        init_tracing();
        let settings = self.scenario.run_settings().clone();
        let threshold = settings.fail_on;

        // 1. Open a session, loading the standard library if asked
        let mut session = Session::open(settings)?;

        // 2. Load template fixtures
        let templates = self.scenario.template_paths();
        if templates.is_empty() {
            return Err(ScenarioError::missing_templates(self.scenario.name()));
        }
        for path in &templates {
            let src = read_fixture(path)?;
            session.read_templates(format_of(path), &src);
        }

        // 3. Check
        session.check();
        if let Some(assertion) = self.scenario.check_assertion() {
            assertion.verify(
                "check",
                &Observed {
                    instances: &[],
                    diagnostics: session.diagnostics(),
                    threshold,
                },
            )?;
        }

        // 4. Expand the root instances
        let Some(path) = self.scenario.instances_path() else {
            return Ok(());
        };
        let src = read_fixture(&path)?;
        let roots = session.read_instances(format_of(&path), &src);
        let produced = session.expand(&roots);
        if let Some(assertion) = self.scenario.expand_assertion() {
            assertion.verify(
                "expand",
                &Observed {
                    instances: &produced,
                    diagnostics: session.diagnostics(),
                    threshold,
                },
            )?;
        }

        Ok(())
    }
}

fn read_fixture(path: &Path) -> ScenarioResult<String> {
    fs::read_to_string(path).map_err(|e| ScenarioError::fixture_read(path, e))
}

/// Format name from the file extension.
fn format_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("json")
}
