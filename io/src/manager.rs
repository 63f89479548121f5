//! Formats by name.

use std::collections::BTreeMap;

use stencil_core::{Message, Outcome};
use stencil_registry::{Instance, Template};
use tracing::debug;

use crate::{Format, FormatError, FormatResult, JsonFormat, Kind, Operation};

/// A registry of formats.
///
/// Forwarding calls check [`Format::supports`] first; a missing format or an
/// unsupported operation becomes a fatal diagnostic.
pub struct FormatManager {
    formats: BTreeMap<String, Box<dyn Format>>,
}

impl Default for FormatManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FormatManager {
    /// A manager with no formats.
    pub fn new() -> Self {
        Self {
            formats: BTreeMap::new(),
        }
    }

    /// A manager with the bundled formats registered.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register(JsonFormat::new());
        manager
    }

    /// Register `format` under its name, replacing any format of that name.
    pub fn register(&mut self, format: impl Format + 'static) {
        debug!(format = format.name(), "registered format");
        self.formats.insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Format> {
        self.formats.get(name).map(|f| f.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(|s| s.as_str())
    }

    pub fn supports(&self, name: &str, operation: Operation, kind: Kind) -> bool {
        self.get(name).is_some_and(|f| f.supports(operation, kind))
    }

    fn lookup(&self, name: &str, operation: Operation, kind: Kind) -> FormatResult<&dyn Format> {
        let format = self.get(name).ok_or_else(|| FormatError::unknown_format(name))?;
        if !format.supports(operation, kind) {
            return Err(FormatError::unsupported(name, operation, kind));
        }
        Ok(format)
    }

    pub fn read_templates(&self, name: &str, src: &str) -> Vec<Outcome<Template>> {
        match self.lookup(name, Operation::Read, Kind::Template) {
            Ok(format) => format.read_templates(src),
            Err(e) => vec![fatal(e)],
        }
    }

    pub fn read_instances(&self, name: &str, src: &str) -> Vec<Outcome<Instance>> {
        match self.lookup(name, Operation::Read, Kind::Instance) {
            Ok(format) => format.read_instances(src),
            Err(e) => vec![fatal(e)],
        }
    }

    pub fn write_templates(&self, name: &str, templates: &[Template]) -> Outcome<String> {
        match self.lookup(name, Operation::Write, Kind::Template) {
            Ok(format) => written(format.write_templates(templates)),
            Err(e) => fatal(e),
        }
    }

    pub fn write_instances(&self, name: &str, instances: &[Instance]) -> Outcome<String> {
        match self.lookup(name, Operation::Write, Kind::Instance) {
            Ok(format) => written(format.write_instances(instances)),
            Err(e) => fatal(e),
        }
    }
}

fn fatal<T>(e: FormatError) -> Outcome<T> {
    Outcome::failed(Message::fatal(e.to_string()))
}

fn written(result: FormatResult<String>) -> Outcome<String> {
    match result {
        Ok(text) => Outcome::ok(text),
        Err(e) => Outcome::failed(Message::error(e.to_string())),
    }
}
