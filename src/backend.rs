use std::fmt;
use std::path::Path;

use crate::events::{EventPayload, QuestEvent};

/// Identifier a backend reports for itself. Unique across the registry
/// and stable for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendId(pub u32);

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Which script slot family a load or dispatch addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Npc,
    Player,
    GlobalNpc,
    GlobalPlayer,
    Item,
    Spell,
}

/// Entity key addressing one loaded script within a kind. The three
/// global/player kinds have a single slot each.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptKey {
    Singleton,
    Id(u32),
    Name(String),
}

impl fmt::Display for ScriptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptKey::Singleton => f.write_str("-"),
            ScriptKey::Id(id) => write!(f, "{id}"),
            ScriptKey::Name(name) => f.write_str(name),
        }
    }
}

/// Capability set every scripting-language backend exposes to the router.
///
/// The router treats a completed `load` as successful regardless of what
/// the backend thought of the file; compile diagnostics are the backend's
/// own to report. `dispatch` is fire-and-forget.
pub trait ScriptBackend {
    fn identifier(&self) -> BackendId;

    /// Compile/parse the script at `path` and associate it with `key`
    /// under `kind`, replacing any previous script in that slot.
    fn load(&mut self, kind: ScriptKind, path: &Path, key: &ScriptKey);

    /// Whether the script loaded for `(kind, key)` declares a handler
    /// named `event_name`.
    fn has_handler(&self, kind: ScriptKind, key: &ScriptKey, event_name: &str) -> bool;

    fn dispatch(&mut self, kind: ScriptKind, key: &ScriptKey, event: QuestEvent, payload: &EventPayload);

    /// Inject a named process-wide string variable visible to scripts.
    fn set_var(&mut self, name: &str, value: &str);

    /// Drop every compiled script. The backend instance itself survives
    /// a quest reload; only its compiled state is discarded.
    fn reload(&mut self);
}
