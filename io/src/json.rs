//! The JSON format.

use serde::de::DeserializeOwned;
use serde_json::Value;
use stencil_core::{Message, Outcome};
use stencil_registry::{Instance, Template};
use tracing::debug;

use crate::dto::{
    document_prefixes, InstanceDocument, InstanceDto, TemplateDocument, TemplateDto,
};
use crate::{Format, FormatError, FormatResult, Kind, Operation};

/// Templates and instances as JSON documents.
///
/// ```json
/// {
///   "prefixes": { "ex": "http://example.com/" },
///   "templates": [
///     {
///       "iri": "ex:Person",
///       "parameters": [{ "variable": "?person", "type": "ottr:IRI" }],
///       "body": [{ "template": "ottr:Triple", "arguments": ["?person", "rdf:type", "ex:Person"] }]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    pub const NAME: &'static str = "json";

    pub fn new() -> Self {
        Self::default()
    }

    /// Indent written documents.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: serde::Serialize>(&self, document: &T) -> FormatResult<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        rendered.map_err(FormatError::write)
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, _operation: Operation, _kind: Kind) -> bool {
        true
    }

    fn read_templates(&self, src: &str) -> Vec<Outcome<Template>> {
        let document: TemplateDocument = match serde_json::from_str(src) {
            Ok(document) => document,
            Err(e) => return vec![unparsable(e)],
        };
        let prefixes = document_prefixes(&document.prefixes);
        let outcomes: Vec<_> = document
            .templates
            .into_iter()
            .enumerate()
            .map(|(index, value)| read_item(index, value, |dto: TemplateDto| dto.to_template(&prefixes)))
            .collect();
        debug!(items = outcomes.len(), "read template document");
        outcomes
    }

    fn read_instances(&self, src: &str) -> Vec<Outcome<Instance>> {
        let document: InstanceDocument = match serde_json::from_str(src) {
            Ok(document) => document,
            Err(e) => return vec![unparsable(e)],
        };
        let prefixes = document_prefixes(&document.prefixes);
        let outcomes: Vec<_> = document
            .instances
            .into_iter()
            .enumerate()
            .map(|(index, value)| read_item(index, value, |dto: InstanceDto| dto.to_instance(&prefixes)))
            .collect();
        debug!(items = outcomes.len(), "read instance document");
        outcomes
    }

    /// Templates are written in IRI order.
    fn write_templates(&self, templates: &[Template]) -> FormatResult<String> {
        let mut sorted: Vec<&Template> = templates.iter().collect();
        sorted.sort_by(|a, b| a.iri().cmp(b.iri()));
        self.render(&TemplateDocument {
            prefixes: Default::default(),
            templates: sorted.into_iter().map(TemplateDto::from_template).collect(),
        })
    }

    fn write_instances(&self, instances: &[Instance]) -> FormatResult<String> {
        self.render(&InstanceDocument {
            prefixes: Default::default(),
            instances: instances.iter().map(InstanceDto::from_instance).collect(),
        })
    }
}

fn unparsable<T>(e: serde_json::Error) -> Outcome<T> {
    Outcome::failed(Message::fatal(FormatError::parse(e).to_string()))
}

/// Decode one document item; a failure affects only that item.
fn read_item<D, T, F>(index: usize, value: Value, convert: F) -> Outcome<T>
where
    D: DeserializeOwned,
    F: FnOnce(D) -> FormatResult<T>,
{
    let result = serde_json::from_value::<D>(value)
        .map_err(|e| FormatError::malformed_item(index, e))
        .and_then(|dto| convert(dto).map_err(|e| FormatError::malformed_item(index, e)));
    match result {
        Ok(item) => Outcome::ok(item),
        Err(e) => Outcome::failed(Message::error(e.to_string())),
    }
}
