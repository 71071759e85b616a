use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::backend::BackendId;

/// Outcome of script resolution for one entity key. Moves from
/// `Unresolved` to exactly one of the other two states and stays there
/// until the whole cache generation is reset by a quest reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never probed.
    Unresolved,
    /// Probed, a file was found, and a load was attempted on this backend.
    Resolved(BackendId),
    /// Probed every candidate; no backend had a matching file.
    Failed,
}

/// Keyed load-state cache for one event class. Unknown keys read as
/// `Unresolved`.
pub struct StatusCache<K> {
    entries: HashMap<K, LoadState>,
}

impl<K: Eq + Hash> StatusCache<K> {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn get<Q>(&self, key: &Q) -> LoadState
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).copied().unwrap_or(LoadState::Unresolved)
    }

    pub fn set(&mut self, key: K, state: LoadState) {
        self.entries.insert(key, state);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Eq + Hash> Default for StatusCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot cache for the keyless classes (player-local, global
/// player, global NPC).
#[derive(Debug, Clone, Copy)]
pub struct SingletonStatus {
    state: LoadState,
}

impl SingletonStatus {
    pub fn new() -> Self {
        Self { state: LoadState::Unresolved }
    }

    pub fn get(&self) -> LoadState {
        self.state
    }

    pub fn set(&mut self, state: LoadState) {
        self.state = state;
    }

    pub fn clear(&mut self) {
        self.state = LoadState::Unresolved;
    }
}

impl Default for SingletonStatus {
    fn default() -> Self {
        Self::new()
    }
}
