//! Stencil IO
//!
//! Reading and writing templates and instances.
//!
//! Responsibilities:
//! - The `Format` capability contract and a registry of formats by name
//! - The JSON format: tagged terms, prefixed names and auto-typed literals
//! - Per-item diagnostics for readers; deterministic writers

mod dto;
mod error;
mod format;
mod json;
mod manager;

pub use error::{FormatError, FormatResult};
pub use format::{Format, Kind, Operation};
pub use json::JsonFormat;
pub use manager::FormatManager;
