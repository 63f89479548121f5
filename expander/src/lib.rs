//! Stencil Expander
//!
//! Rewrite instances into base instances over a read-only template store.
//!
//! Responsibilities:
//! - Bind arguments to parameters, applying defaults
//! - Keep body-local blank nodes distinct per expansion site
//! - Apply list expanders and drop instances missing required arguments
//! - Refuse cyclic stores and bound the expansion depth
//! - Expand independent roots in parallel
//! - Rewrite template bodies down to base instances

mod engine;
mod error;
mod substitution;

pub use engine::{Expander, Expansion};
pub use error::{ExpandError, ExpandResult};
pub use substitution::Substitution;

/// Maximum nesting of template expansions below one root.
pub const MAX_DEPTH: usize = 256;
