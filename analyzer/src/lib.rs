//! Stencil Analyzer
//!
//! Static consistency checking of a populated template store.
//!
//! Responsibilities:
//! - Arity, type, required-argument and reference checks for every body instance
//! - Bottom-up inference of types for untyped parameters
//! - Parameter hygiene: unused, undefined and conflicting parameters
//! - Propagating failure to every template that depends on a failing one

mod checker;
mod error;
mod inference;

pub use checker::{check, Checker};
pub use error::CheckError;
pub use inference::{term_type, TypeInference, Usage};
