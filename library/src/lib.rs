//! Stencil Standard Library
//!
//! The predefined templates shipped with Stencil.
//!
//! Responsibilities:
//! - Bundle the rdf, rdfs and owl template sources into the binary
//! - Read them through a format manager into a shared `StandardLibrary`
//! - Leave packaging templates out of the loaded library

use std::sync::Arc;

use stencil_core::{vocab, Diagnostics, Message, Outcome};
use stencil_io::{FormatManager, JsonFormat};
use stencil_registry::{StandardLibrary, Template};
use tracing::{debug, info};

/// A bundled template document.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub name: &'static str,
    pub format: &'static str,
    pub text: &'static str,
}

/// The documents the standard library is read from.
pub const SOURCES: [Source; 4] = [
    Source {
        name: "rdf",
        format: JsonFormat::NAME,
        text: include_str!("../templates/rdf.json"),
    },
    Source {
        name: "rdfs",
        format: JsonFormat::NAME,
        text: include_str!("../templates/rdfs.json"),
    },
    Source {
        name: "owl",
        format: JsonFormat::NAME,
        text: include_str!("../templates/owl.json"),
    },
    Source {
        name: "package",
        format: JsonFormat::NAME,
        text: include_str!("../templates/package.json"),
    },
];

/// Read the bundled sources into a standard library.
///
/// Templates in the packaging namespace are skipped. A source that fails to
/// read contributes its diagnostics; the library holds every template that
/// did read.
pub fn load_standard_library(formats: &FormatManager) -> Outcome<Arc<StandardLibrary>> {
    load_sources(formats, &SOURCES)
}

/// Read a standard library from `sources`.
pub fn load_sources(formats: &FormatManager, sources: &[Source]) -> Outcome<Arc<StandardLibrary>> {
    let mut diagnostics = Diagnostics::new();
    let mut templates: Vec<Template> = Vec::new();

    for source in sources {
        let (read, messages) = Outcome::gather(formats.read_templates(source.format, source.text));
        debug!(source = source.name, templates = read.len(), "read library source");
        diagnostics.merge(messages);

        for template in read {
            if template.iri().starts_with(vocab::PACKAGE_NS) {
                diagnostics.push(
                    Message::info("Skipped packaging template in standard library")
                        .with_template(template.iri()),
                );
                continue;
            }
            templates.push(template);
        }
    }

    if diagnostics.has_fatal() {
        return Outcome::from_parts(None, diagnostics);
    }
    match StandardLibrary::new(templates) {
        Ok(library) => {
            info!(templates = library.len(), "loaded standard library");
            Outcome::from_parts(Some(Arc::new(library)), diagnostics)
        }
        Err(e) => {
            diagnostics.push(Message::fatal(e.to_string()));
            Outcome::from_parts(None, diagnostics)
        }
    }
}
