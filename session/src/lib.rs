//! Stencil Session
//!
//! The pipeline a command line or embedding host drives.
//!
//! Responsibilities:
//! - Hold settings, formats and the template store for one run
//! - Load the standard library and user templates
//! - Check, expand and write, halting once the failure threshold is met
//! - Report the worst severity and the resulting exit code

mod error;
mod report;
mod session;
mod settings;

pub use error::{SessionError, SessionResult};
pub use report::Report;
pub use session::Session;
pub use settings::Settings;
