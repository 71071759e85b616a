use std::collections::HashMap;

use crate::backend::{BackendId, ScriptBackend};

/// Registered scripting backends plus the precedence order used for every
/// fallback probe. Registration order is probe order; first registered
/// wins ties.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<BackendId, Box<dyn ScriptBackend>>,
    extensions: HashMap<BackendId, String>,
    // Registration order. Re-registering an identifier appends a second
    // entry here while the maps above overwrite; that backend is then
    // probed twice per stem. Known quirk, kept on purpose.
    precedence: Vec<BackendId>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, backend: Box<dyn ScriptBackend>, extension: impl Into<String>) {
        let id = backend.identifier();
        self.backends.insert(id, backend);
        self.extensions.insert(id, extension.into());
        self.precedence.push(id);
    }

    /// Forward a named string variable to every backend in precedence
    /// order.
    pub fn broadcast_var(&mut self, name: &str, value: &str) {
        let order = self.precedence.clone();
        for id in order {
            self.backend_mut(id).set_var(name, value);
        }
    }

    /// Tell every backend to drop its compiled scripts.
    pub fn reload_all(&mut self) {
        let order = self.precedence.clone();
        for id in order {
            self.backend_mut(id).reload();
        }
    }

    pub fn precedence(&self) -> &[BackendId] {
        &self.precedence
    }

    pub fn is_empty(&self) -> bool {
        self.precedence.is_empty()
    }

    /// Extension tag for a registered backend. A missing entry for an id
    /// taken from the precedence list means the registry is corrupt.
    pub fn extension(&self, id: BackendId) -> &str {
        self.extensions
            .get(&id)
            .unwrap_or_else(|| panic!("backend {id} has no registered extension"))
    }

    /// Backend lookup for an identifier previously handed out by this
    /// registry. Absence is cache/registry desynchronization, a
    /// programming fault, never normal control flow.
    pub fn backend(&self, id: BackendId) -> &dyn ScriptBackend {
        self.backends
            .get(&id)
            .unwrap_or_else(|| panic!("cached backend {id} missing from registry"))
            .as_ref()
    }

    pub fn backend_mut(&mut self, id: BackendId) -> &mut dyn ScriptBackend {
        self.backends
            .get_mut(&id)
            .unwrap_or_else(|| panic!("cached backend {id} missing from registry"))
            .as_mut()
    }
}
