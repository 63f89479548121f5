//! Session pipeline.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use stencil_core::{Diagnostics, Message, Outcome};
use stencil_expander::Expander;
use stencil_io::FormatManager;
use stencil_registry::{Instance, Template, TemplateStore};
use tracing::{debug, info, warn};

use crate::{Report, SessionError, SessionResult, Settings};

/// One run over a template store.
///
/// Every stage adds its messages to the session's diagnostics. Once those
/// reach the failure threshold, expansion and writing are skipped.
pub struct Session {
    settings: Settings,
    formats: FormatManager,
    store: TemplateStore,
    diagnostics: Diagnostics,
    produced: usize,
    /// Expansion sites used so far in this run.
    sites: Arc<AtomicU64>,
}

impl Session {
    /// Create a session with the default formats and an empty store.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            formats: FormatManager::default(),
            store: TemplateStore::new(),
            diagnostics: Diagnostics::new(),
            produced: 0,
            sites: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a session, loading the standard library if the settings ask
    /// for it.
    pub fn open(settings: Settings) -> SessionResult<Self> {
        let mut session = Self::new(settings);
        if session.settings.load_standard_library {
            session.load_standard_library()?;
        }
        Ok(session)
    }

    /// Replace the format manager.
    pub fn with_formats(mut self, formats: FormatManager) -> Self {
        self.formats = formats;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn formats(&self) -> &FormatManager {
        &self.formats
    }

    pub fn formats_mut(&mut self) -> &mut FormatManager {
        &mut self.formats
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Whether the diagnostics so far fail the run.
    pub fn is_halted(&self) -> bool {
        self.diagnostics.fails(self.settings.fail_on)
    }

    // ==================== Loading ====================

    /// Load the bundled standard library into the store. Loading twice is a
    /// no-op.
    pub fn load_standard_library(&mut self) -> SessionResult<()> {
        if self.store.standard_library().is_some() {
            debug!("standard library already loaded");
            return Ok(());
        }
        let (library, messages) = stencil_library::load_standard_library(&self.formats).into_parts();
        self.diagnostics.merge(messages);
        let library = library.ok_or(SessionError::LibraryUnavailable)?;
        self.store.register_standard_library(library)?;
        Ok(())
    }

    /// Read templates from `src` and register them. Returns how many were
    /// registered; unreadable or rejected templates become error messages.
    pub fn read_templates(&mut self, format: &str, src: &str) -> usize {
        let (templates, messages) = Outcome::gather(self.formats.read_templates(format, src));
        self.diagnostics.merge(messages);

        let mut registered = 0;
        for template in templates {
            let iri = template.iri().to_string();
            match self.store.register(template) {
                Ok(()) => registered += 1,
                Err(e) => self.diagnostics.push(Message::error(e.to_string()).with_template(iri)),
            }
        }
        info!(format, registered, "read templates");
        registered
    }

    /// Read instances from `src`. Unreadable instances are left out and
    /// reported.
    pub fn read_instances(&mut self, format: &str, src: &str) -> Vec<Instance> {
        let (instances, messages) = Outcome::gather(self.formats.read_instances(format, src));
        self.diagnostics.merge(messages);
        debug!(format, count = instances.len(), "read instances");
        instances
    }

    // ==================== Checking ====================

    /// Check the store unless checks are switched off. Returns whether the
    /// run may continue.
    pub fn check(&mut self) -> bool {
        if !self.settings.check {
            info!("static checks skipped");
            return !self.is_halted();
        }
        let found = stencil_analyzer::check(&self.store);
        self.diagnostics.merge(found);
        !self.is_halted()
    }

    // ==================== Expansion ====================

    fn expander(&self) -> Expander<'_> {
        Expander::new(&self.store)
            .with_max_depth(self.settings.max_depth)
            .with_checking(!self.settings.check)
            .with_sites(Arc::clone(&self.sites))
    }

    /// Expand `roots` into base instances.
    pub fn expand(&mut self, roots: &[Instance]) -> Vec<Instance> {
        if self.is_halted() {
            warn!(roots = roots.len(), "expansion skipped, run already failed");
            return Vec::new();
        }
        let expander = self.expander();
        let (instances, messages) = if self.settings.parallel {
            expander.expand_parallel(roots)
        } else {
            Outcome::gather(expander.expand(roots))
        };
        let dropped = expander.dropped();

        self.diagnostics.merge(messages);
        self.produced += instances.len();
        info!(roots = roots.len(), produced = instances.len(), dropped, "expanded instances");
        instances
    }

    /// Rewrite every user template into one whose body holds only base
    /// instances, sorted by IRI.
    pub fn expand_templates(&mut self) -> Vec<Template> {
        if self.is_halted() {
            warn!("template expansion skipped, run already failed");
            return Vec::new();
        }
        let (store, messages) = self.expander().expand_all().into_parts();
        self.diagnostics.merge(messages);
        store
            .map(|store| store.user_templates().cloned().collect())
            .unwrap_or_default()
    }

    // ==================== Writing ====================

    pub fn write_instances(&mut self, format: &str, instances: &[Instance]) -> Option<String> {
        if self.is_halted() {
            return None;
        }
        let (text, messages) = self.formats.write_instances(format, instances).into_parts();
        self.diagnostics.merge(messages);
        text
    }

    pub fn write_templates(&mut self, format: &str, templates: &[Template]) -> Option<String> {
        if self.is_halted() {
            return None;
        }
        let (text, messages) = self.formats.write_templates(format, templates).into_parts();
        self.diagnostics.merge(messages);
        text
    }

    // ==================== Reporting ====================

    pub fn report(&self) -> Report {
        Report::new(&self.diagnostics, self.settings.fail_on, self.produced)
    }
}
