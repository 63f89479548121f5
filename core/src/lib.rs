//! Stencil Core Types
//!
//! This crate provides the foundational types used throughout Stencil:
//! - Terms (IRIs, blank nodes, literals, lists, none) and their variable flag
//! - The type lattice used for argument checking and inference
//! - Diagnostics: severities, messages and the value-with-messages `Outcome`
//! - Well-known vocabulary IRIs and prefix handling
//! - Common error types

mod diagnostic;
mod error;
mod term;
mod types;
pub mod vocab;

pub use diagnostic::*;
pub use error::*;
pub use term::*;
pub use types::*;
pub use vocab::Prefixes;
