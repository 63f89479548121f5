//! The format capability contract.

use std::fmt;

use stencil_core::{Message, Outcome};
use stencil_registry::{Instance, Template};

use crate::{FormatError, FormatResult};

/// Direction of a format operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "reading"),
            Operation::Write => write!(f, "writing"),
        }
    }
}

/// What a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Template,
    Instance,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Template => write!(f, "template"),
            Kind::Instance => write!(f, "instance"),
        }
    }
}

/// A serialization of templates and instances.
///
/// Every operation has a default body reporting it as unsupported, so a
/// format only implements what it can do and advertises it via
/// [`Format::supports`].
pub trait Format: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, operation: Operation, kind: Kind) -> bool;

    /// One outcome per template in `src`. An unparsable document yields a
    /// single fatal outcome.
    fn read_templates(&self, src: &str) -> Vec<Outcome<Template>> {
        let _ = src;
        vec![unsupported(self.name(), Operation::Read, Kind::Template)]
    }

    fn read_instances(&self, src: &str) -> Vec<Outcome<Instance>> {
        let _ = src;
        vec![unsupported(self.name(), Operation::Read, Kind::Instance)]
    }

    fn write_templates(&self, templates: &[Template]) -> FormatResult<String> {
        let _ = templates;
        Err(FormatError::unsupported(self.name(), Operation::Write, Kind::Template))
    }

    fn write_instances(&self, instances: &[Instance]) -> FormatResult<String> {
        let _ = instances;
        Err(FormatError::unsupported(self.name(), Operation::Write, Kind::Instance))
    }
}

fn unsupported<T>(name: &str, operation: Operation, kind: Kind) -> Outcome<T> {
    Outcome::failed(Message::fatal(
        FormatError::unsupported(name, operation, kind).to_string(),
    ))
}
