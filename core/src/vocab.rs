//! Well-known namespaces and IRIs.
//!
//! These constants keep vocabulary spelling consistent between the registry,
//! the standard library and the formats.

use std::collections::BTreeMap;

use crate::{CoreError, CoreResult};

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OTTR: &str = "http://ns.ottr.xyz/0.4/";

/// Root of the bundled standard library.
pub const LIBRARY_NS: &str = "http://tpl.ottr.xyz/";
/// Packaging templates of the standard library; never loaded.
pub const PACKAGE_NS: &str = "http://tpl.ottr.xyz/p/";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

/// Triple emission primitive.
pub const TRIPLE: &str = "http://ns.ottr.xyz/0.4/Triple";
/// Triple emission primitive whose positions are all optional.
pub const NULLABLE_TRIPLE: &str = "http://ns.ottr.xyz/0.4/NullableTriple";

/// A prefix to namespace mapping used for compact names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefixes {
    map: BTreeMap<String, String>,
}

impl Prefixes {
    /// Create an empty prefix map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The prefixes every document may use without declaring them.
    pub fn standard() -> Self {
        let mut prefixes = Self::new();
        prefixes.insert("rdf", RDF);
        prefixes.insert("rdfs", RDFS);
        prefixes.insert("owl", OWL);
        prefixes.insert("xsd", XSD);
        prefixes.insert("ottr", OTTR);
        prefixes
    }

    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.map.insert(prefix.into(), namespace.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Merge another map into this one; entries of `other` win.
    pub fn extend(&mut self, other: &Prefixes) {
        for (prefix, ns) in other.iter() {
            self.insert(prefix, ns);
        }
    }

    /// Resolve a name to a full IRI.
    ///
    /// Accepts `<iri>`, absolute IRIs (containing `://` or starting with
    /// `urn:`) and prefixed names.
    pub fn expand(&self, name: &str) -> CoreResult<String> {
        let name = name.trim();
        if let Some(inner) = name.strip_prefix('<').and_then(|n| n.strip_suffix('>')) {
            return Ok(inner.to_string());
        }
        if name.contains("://") || name.starts_with("urn:") {
            return Ok(name.to_string());
        }
        let (prefix, local) = name
            .split_once(':')
            .ok_or_else(|| CoreError::unknown_prefix(name))?;
        let ns = self
            .get(prefix)
            .ok_or_else(|| CoreError::unknown_prefix(name))?;
        Ok(format!("{}{}", ns, local))
    }

    /// Shorten an IRI to a prefixed name, choosing the longest namespace.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.map
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()) && iri.len() > ns.len())
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
    }
}
