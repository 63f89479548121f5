//! The template store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use stencil_core::{vocab, BasicType, Term, Type};
use tracing::{debug, info};

use crate::{
    DependencyGraph, Parameter, RegistryError, RegistryResult, StandardLibrary, Template,
    TemplateBuilder,
};

/// The part of a store a template lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Base templates every store provides.
    Builtin,
    /// The read-only standard library.
    Library,
    /// Templates registered by the user.
    User,
}

/// Registry of templates keyed by IRI.
///
/// Lookups fall back from the user region to the standard library and then
/// to the builtin base templates. The store is only mutated while loading;
/// checking and expansion borrow it immutably.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    builtins: BTreeMap<String, Template>,
    library: Option<Arc<StandardLibrary>>,
    user: BTreeMap<String, Template>,
    graph: DependencyGraph,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a store holding only the builtin base templates.
    pub fn new() -> Self {
        let mut store = Self {
            builtins: BTreeMap::new(),
            library: None,
            user: BTreeMap::new(),
            graph: DependencyGraph::new(),
        };
        for template in base_templates() {
            store.graph.add_template(template.iri(), []);
            store.builtins.insert(template.iri().to_string(), template);
        }
        store
    }

    /// Create a store with a standard library already registered.
    pub fn with_standard_library(library: Arc<StandardLibrary>) -> RegistryResult<Self> {
        let mut store = Self::new();
        store.register_standard_library(library)?;
        Ok(store)
    }

    /// A store sharing this store's standard library, with an empty user region.
    pub fn without_user_templates(&self) -> Self {
        let mut store = Self::new();
        if let Some(library) = &self.library {
            store.add_library_edges(library);
            store.library = Some(Arc::clone(library));
        }
        store
    }

    // ==================== Registration ====================

    /// Register a user template.
    ///
    /// A forward declaration may be replaced once by a template with the same
    /// parameters; any other redefinition is an error.
    pub fn register(&mut self, template: Template) -> RegistryResult<()> {
        let iri = template.iri().to_string();
        if self.builtins.contains_key(&iri) {
            return Err(RegistryError::redefines_builtin(iri));
        }
        if self.library.as_ref().is_some_and(|lib| lib.contains(&iri)) {
            return Err(RegistryError::collides_with_standard_library(iri));
        }
        if let Some(existing) = self.user.get(&iri) {
            let upgrades = existing.is_declaration()
                && !template.is_declaration()
                && existing.parameters() == template.parameters();
            if !upgrades {
                return Err(RegistryError::duplicate_template(iri));
            }
            debug!(template = %iri, "forward declaration replaced by definition");
        }

        self.graph.add_template(&iri, template.dependencies());
        debug!(template = %iri, body = template.body().len(), "registered template");
        self.user.insert(iri, template);
        Ok(())
    }

    /// Register the standard library. Fails if a user template already uses
    /// one of its IRIs or a library is already present.
    pub fn register_standard_library(&mut self, library: Arc<StandardLibrary>) -> RegistryResult<()> {
        if self.library.is_some() {
            return Err(RegistryError::LibraryAlreadyRegistered);
        }
        if let Some(iri) = self.user.keys().find(|iri| library.contains(iri)) {
            return Err(RegistryError::collides_with_standard_library(iri.clone()));
        }
        if let Some(iri) = library.iris().find(|iri| self.builtins.contains_key(*iri)) {
            return Err(RegistryError::redefines_builtin(iri));
        }
        self.add_library_edges(&library);
        info!(templates = library.len(), "registered standard library");
        self.library = Some(library);
        Ok(())
    }

    fn add_library_edges(&mut self, library: &StandardLibrary) {
        for template in library.templates() {
            self.graph.add_template(template.iri(), template.dependencies());
        }
    }

    // ==================== Lookups ====================

    /// Find a template, user region first.
    pub fn get(&self, iri: &str) -> Option<&Template> {
        self.user
            .get(iri)
            .or_else(|| self.library.as_ref().and_then(|lib| lib.get(iri)))
            .or_else(|| self.builtins.get(iri))
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.get(iri).is_some()
    }

    /// The region a template is found in.
    pub fn region_of(&self, iri: &str) -> Option<Region> {
        if self.user.contains_key(iri) {
            Some(Region::User)
        } else if self.library.as_ref().is_some_and(|lib| lib.contains(iri)) {
            Some(Region::Library)
        } else if self.builtins.contains_key(iri) {
            Some(Region::Builtin)
        } else {
            None
        }
    }

    pub fn standard_library(&self) -> Option<&Arc<StandardLibrary>> {
        self.library.as_ref()
    }

    pub fn all_user_template_iris(&self) -> BTreeSet<String> {
        self.user.keys().cloned().collect()
    }

    pub fn all_standard_library_iris(&self) -> BTreeSet<String> {
        self.library
            .iter()
            .flat_map(|lib| lib.iris().map(str::to_string))
            .collect()
    }

    /// Every IRI in every region.
    pub fn all_template_iris(&self) -> BTreeSet<String> {
        let mut iris = self.all_user_template_iris();
        iris.extend(self.all_standard_library_iris());
        iris.extend(self.builtins.keys().cloned());
        iris
    }

    /// User templates in IRI order.
    pub fn user_templates(&self) -> impl Iterator<Item = &Template> {
        self.user.values()
    }

    /// Every template with its region, builtins first, then library, then user.
    pub fn templates(&self) -> impl Iterator<Item = (&Template, Region)> {
        let builtins = self.builtins.values().map(|t| (t, Region::Builtin));
        let library = self
            .library
            .iter()
            .flat_map(|lib| lib.templates().map(|t| (t, Region::Library)));
        let user = self.user.values().map(|t| (t, Region::User));
        builtins.chain(library).chain(user)
    }

    // ==================== Dependency Graph ====================

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Transitive closure of IRIs referenced from `iri`.
    pub fn dependencies_of(&self, iri: &str) -> BTreeSet<String> {
        self.graph.dependencies_of(iri)
    }

    /// Transitive closure of templates referencing `iri`.
    pub fn dependents_of(&self, iri: &str) -> BTreeSet<String> {
        self.graph.dependents_of(iri)
    }

    /// Referenced IRIs with no definition in any region.
    pub fn missing_dependencies(&self) -> BTreeSet<String> {
        self.graph
            .iris()
            .filter(|iri| !self.contains(iri))
            .map(str::to_string)
            .collect()
    }

    /// IRIs on a reference cycle.
    pub fn detect_cycles(&self) -> BTreeSet<String> {
        self.graph.detect_cycles()
    }

    /// Dependencies before dependents, or the cyclic IRIs.
    pub fn topological_order(&self) -> Result<Vec<String>, BTreeSet<String>> {
        self.graph.topological_order()
    }
}

/// The triple emission primitives.
fn base_templates() -> Vec<Template> {
    let iri = || Type::Basic(BasicType::Iri);
    let triple = TemplateBuilder::new(vocab::TRIPLE)
        .param(Parameter::new(Term::var_blank("subject")).with_type(iri()))
        .param(
            Parameter::new(Term::var_blank("predicate"))
                .with_type(iri())
                .non_blank(),
        )
        .param(Parameter::new(Term::var_blank("object")))
        .base()
        .build();
    let nullable = TemplateBuilder::new(vocab::NULLABLE_TRIPLE)
        .param(
            Parameter::new(Term::var_blank("subject"))
                .with_type(iri())
                .optional(),
        )
        .param(
            Parameter::new(Term::var_blank("predicate"))
                .with_type(iri())
                .non_blank()
                .optional(),
        )
        .param(Parameter::new(Term::var_blank("object")).optional())
        .base()
        .build();
    // Both are statically valid; `build` only rejects malformed definitions.
    [triple, nullable].into_iter().flatten().collect()
}
