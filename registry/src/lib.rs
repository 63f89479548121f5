//! Stencil Registry
//!
//! The template model and the store templates are registered in.
//!
//! Responsibilities:
//! - Parameters, arguments and list expansion
//! - Signatures, templates and instances, with validating builders
//! - The template store with builtin, standard library and user regions
//! - The dependency graph: transitive dependencies, cycles, topological order

mod argument;
mod builder;
mod error;
mod graph;
mod library;
mod parameter;
mod store;
mod template;

pub use argument::{Argument, ArgumentList, ListExpander};
pub use builder::{InstanceBuilder, TemplateBuilder};
pub use error::{RegistryError, RegistryResult};
pub use graph::DependencyGraph;
pub use library::StandardLibrary;
pub use parameter::Parameter;
pub use store::{Region, TemplateStore};
pub use template::{Instance, Signature, Template};
