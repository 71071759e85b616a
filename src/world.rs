use serde::Deserialize;

/// Opaque handle to a mob in the embedding world model. The router never
/// dereferences it; backends hand it back to the host when a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MobId(pub u64);

/// The zone the router is currently serving. Player-local resolution is
/// impossible without one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneContext {
    pub short_name: String,
    pub instance_version: u32,
}

impl ZoneContext {
    pub fn new(short_name: impl Into<String>, instance_version: u32) -> Self {
        Self { short_name: short_name.into(), instance_version }
    }
}

/// The item fields the router needs for script-key derivation. A copy,
/// not a handle: item instances are owned by the world model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemSnapshot {
    pub id: u32,
    #[serde(default)]
    pub charm_file: String,
    #[serde(default)]
    pub script_file_id: u32,
}

/// NPC type id to display name lookup, answered by the embedding server
/// (usually from its database). `None` means the type id is unknown.
pub trait NpcDirectory {
    fn npc_type_name(&self, npc_type_id: u32) -> Option<String>;
}

/// Quest timer subsystem, optionally flushed ahead of a quest reload.
pub trait TimerSink {
    fn clear_all_timers(&mut self);
}
