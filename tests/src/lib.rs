//! Stencil Integration Test Framework
//!
//! Provides a fluent API for writing integration tests against Stencil.
//!
//! # Structure
//!
//! - **fixtures/level-N/<topic>/** - template and instance documents
//! - **tests/levelN_<topic>.rs** - scenarios: fixtures plus assertions per stage
//!
//! # Example
//!
//! ```ignore
//! use stencil_tests::prelude::*;
//!
//! pub fn scenario() -> Scenario {
//!     Scenario::new("optional")
//!         .templates("level-1/optional/templates.json")
//!         .instances("level-1/optional/instances.json")
//!         .check(|a| a.passes())
//!         .expand(|a| a.count(2))
//! }
//!
//! #[test]
//! fn test() {
//!     scenario().run().unwrap();
//! }
//! ```

mod assertion;
mod error;
mod runner;
mod scenario;

use tracing_subscriber::EnvFilter;

pub use assertion::{Assertion, AssertionBuilder, Observed, Triple};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::Scenario;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::init_tracing;
    pub use crate::scenario::Scenario;
    pub use stencil_session::Settings;
}

/// Install a test-friendly subscriber once. Filtered by `RUST_LOG`,
/// warnings only by default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}
