#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use questline::{
    BackendId, EventPayload, FileProbe, NpcDirectory, QuestEvent, ScriptBackend, ScriptKey,
    ScriptKind,
};

/// Everything a backend was asked to do, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load { kind: ScriptKind, path: PathBuf, key: ScriptKey },
    Dispatch { kind: ScriptKind, key: ScriptKey, event: &'static str },
    SetVar { name: String, value: String },
    Reload,
}

pub type CallLog = Rc<RefCell<Vec<(BackendId, Call)>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<(BackendId, Call)> {
    log.borrow().clone()
}

/// Script backend double that records every call into a shared log and
/// claims handlers from a fixed set.
pub struct RecordingBackend {
    id: BackendId,
    log: CallLog,
    handlers: HashSet<(ScriptKind, String)>,
}

impl RecordingBackend {
    pub fn new(id: u32, log: CallLog) -> Self {
        Self { id: BackendId(id), log, handlers: HashSet::new() }
    }

    pub fn with_handler(mut self, kind: ScriptKind, event_name: &str) -> Self {
        self.handlers.insert((kind, event_name.to_string()));
        self
    }
}

impl ScriptBackend for RecordingBackend {
    fn identifier(&self) -> BackendId {
        self.id
    }

    fn load(&mut self, kind: ScriptKind, path: &Path, key: &ScriptKey) {
        self.log.borrow_mut().push((
            self.id,
            Call::Load { kind, path: path.to_path_buf(), key: key.clone() },
        ));
    }

    fn has_handler(&self, kind: ScriptKind, _key: &ScriptKey, event_name: &str) -> bool {
        self.handlers.contains(&(kind, event_name.to_string()))
    }

    fn dispatch(&mut self, kind: ScriptKind, key: &ScriptKey, event: QuestEvent, _payload: &EventPayload) {
        self.log.borrow_mut().push((
            self.id,
            Call::Dispatch { kind, key: key.clone(), event: event.name() },
        ));
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.log
            .borrow_mut()
            .push((self.id, Call::SetVar { name: name.to_string(), value: value.to_string() }));
    }

    fn reload(&mut self) {
        self.log.borrow_mut().push((self.id, Call::Reload));
    }
}

/// In-memory filesystem probe that records every existence check.
#[derive(Clone, Default)]
pub struct CountingProbe {
    probed: Rc<RefCell<Vec<PathBuf>>>,
    existing: Rc<RefCell<HashSet<PathBuf>>>,
}

impl CountingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a path as present. May be called after the router is built;
    /// the probe shares state with every clone of itself.
    pub fn add(&self, path: impl Into<PathBuf>) {
        self.existing.borrow_mut().insert(path.into());
    }

    pub fn probe_count(&self) -> usize {
        self.probed.borrow().len()
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }
}

impl FileProbe for CountingProbe {
    fn exists(&self, path: &Path) -> bool {
        self.probed.borrow_mut().push(path.to_path_buf());
        self.existing.borrow().contains(path)
    }
}

/// Fixed NPC type id to display name table.
#[derive(Default)]
pub struct StaticNpcs {
    names: HashMap<u32, String>,
}

impl StaticNpcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, npc_type_id: u32, name: &str) -> Self {
        self.names.insert(npc_type_id, name.to_string());
        self
    }
}

impl NpcDirectory for StaticNpcs {
    fn npc_type_name(&self, npc_type_id: u32) -> Option<String> {
        self.names.get(&npc_type_id).cloned()
    }
}
