//! The standard library value.

use std::collections::BTreeMap;

use crate::{RegistryError, RegistryResult, Template};

/// A read-only, separately namespaced set of predefined templates.
///
/// Produced once by a loader and shared between stores by `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardLibrary {
    templates: BTreeMap<String, Template>,
}

impl StandardLibrary {
    /// Collect templates, rejecting duplicate IRIs.
    pub fn new(templates: impl IntoIterator<Item = Template>) -> RegistryResult<Self> {
        let mut map = BTreeMap::new();
        for template in templates {
            let iri = template.iri().to_string();
            if map.insert(iri.clone(), template).is_some() {
                return Err(RegistryError::duplicate_template(iri));
            }
        }
        Ok(Self { templates: map })
    }

    pub fn get(&self, iri: &str) -> Option<&Template> {
        self.templates.get(iri)
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.templates.contains_key(iri)
    }

    /// IRIs in sorted order.
    pub fn iris(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
