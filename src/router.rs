use std::path::PathBuf;

use crate::backend::{BackendId, ScriptBackend, ScriptKey, ScriptKind};
use crate::cache::{LoadState, SingletonStatus, StatusCache};
use crate::config::QuestConfig;
use crate::events::{EventPayload, QuestEvent};
use crate::registry::BackendRegistry;
use crate::resolve::{FileProbe, FsProbe, ResolveContext, Resolver};
use crate::world::{ItemSnapshot, NpcDirectory, TimerSink, ZoneContext};

/// Derive the cache/resolution key for an item event.
///
/// Scale-calc and enter-zone events key on the item's charm file; click
/// events key on `script_<script_file_id>`; everything else keys on the
/// item id. The first two carve-outs route to a different cache slot than
/// a plain id-keyed event on the same item, and that split is load-bearing
/// for live content, so it is keyed on the event name here exactly as the
/// query path sees it.
pub fn item_script_key(event_name: &str, item: &ItemSnapshot) -> String {
    match event_name {
        "EVENT_SCALE_CALC" | "EVENT_ITEM_ENTERZONE" => item.charm_file.clone(),
        "EVENT_ITEM_CLICK" | "EVENT_ITEM_CLICK_CAST" => format!("script_{}", item.script_file_id),
        _ => item.id.to_string(),
    }
}

/// Routes quest queries and events to whichever scripting backend owns
/// the script for the entity in question, resolving and loading each
/// script at most once per cache generation.
///
/// One router per zone process. Everything here is single-threaded and
/// synchronous; a slow backend load stalls the simulation tick.
pub struct QuestRouter<P: FileProbe = FsProbe> {
    config: QuestConfig,
    registry: BackendRegistry,
    resolver: Resolver<P>,
    npcs: Box<dyn NpcDirectory>,
    timers: Option<Box<dyn TimerSink>>,
    zone: Option<ZoneContext>,
    npc_status: StatusCache<u32>,
    spell_status: StatusCache<u32>,
    item_status: StatusCache<String>,
    player_status: SingletonStatus,
    global_player_status: SingletonStatus,
    global_npc_status: SingletonStatus,
}

impl QuestRouter<FsProbe> {
    pub fn new(config: QuestConfig, npcs: Box<dyn NpcDirectory>) -> Self {
        Self::with_probe(config, npcs, FsProbe)
    }
}

impl<P: FileProbe> QuestRouter<P> {
    pub fn with_probe(config: QuestConfig, npcs: Box<dyn NpcDirectory>, probe: P) -> Self {
        Self {
            config,
            registry: BackendRegistry::new(),
            resolver: Resolver::new(probe),
            npcs,
            timers: None,
            zone: None,
            npc_status: StatusCache::new(),
            spell_status: StatusCache::new(),
            item_status: StatusCache::new(),
            player_status: SingletonStatus::new(),
            global_player_status: SingletonStatus::new(),
            global_npc_status: SingletonStatus::new(),
        }
    }

    pub fn register_backend(&mut self, backend: Box<dyn ScriptBackend>, extension: impl Into<String>) {
        self.registry.register(backend, extension);
    }

    /// Inject a named string variable into every registered backend, in
    /// precedence order.
    pub fn broadcast_var(&mut self, name: &str, value: &str) {
        self.registry.broadcast_var(name, value);
    }

    pub fn set_timer_sink(&mut self, timers: Box<dyn TimerSink>) {
        self.timers = Some(timers);
    }

    /// Update the zone this router serves. Usually set once at zone boot
    /// and refreshed on zone change, alongside a quest reload.
    pub fn set_zone(&mut self, zone: Option<ZoneContext>) {
        self.zone = zone;
    }

    pub fn zone(&self) -> Option<&ZoneContext> {
        self.zone.as_ref()
    }

    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    /// Drop the whole cache generation: timers first when requested, then
    /// every per-class cache back to unresolved, then every backend's
    /// compiled scripts.
    pub fn reload_quests(&mut self, reset_timers: bool) {
        if reset_timers {
            if let Some(timers) = self.timers.as_mut() {
                timers.clear_all_timers();
            }
        }
        self.npc_status.clear();
        self.spell_status.clear();
        self.item_status.clear();
        self.player_status.clear();
        self.global_player_status.clear();
        self.global_npc_status.clear();
        self.registry.reload_all();
    }

    // ---- queries ----------------------------------------------------

    /// Does any loaded script (entity-local or global) declare a handler
    /// named `subname` for this NPC? Local is consulted first.
    pub fn has_quest_sub(&mut self, npc_type_id: u32, subname: &str) -> bool {
        self.has_quest_sub_local(npc_type_id, subname) || self.has_quest_sub_global(subname)
    }

    pub fn has_quest_sub_local(&mut self, npc_type_id: u32, subname: &str) -> bool {
        match self.npc_state(npc_type_id) {
            LoadState::Resolved(id) => {
                self.registry
                    .backend(id)
                    .has_handler(ScriptKind::Npc, &ScriptKey::Id(npc_type_id), subname)
            }
            _ => false,
        }
    }

    pub fn has_quest_sub_global(&mut self, subname: &str) -> bool {
        match self.global_npc_state() {
            LoadState::Resolved(id) => {
                self.registry
                    .backend(id)
                    .has_handler(ScriptKind::GlobalNpc, &ScriptKey::Singleton, subname)
            }
            _ => false,
        }
    }

    pub fn player_has_quest_sub(&mut self, subname: &str) -> bool {
        self.player_has_quest_sub_local(subname) || self.player_has_quest_sub_global(subname)
    }

    pub fn player_has_quest_sub_local(&mut self, subname: &str) -> bool {
        match self.player_state() {
            LoadState::Resolved(id) => {
                self.registry
                    .backend(id)
                    .has_handler(ScriptKind::Player, &ScriptKey::Singleton, subname)
            }
            _ => false,
        }
    }

    pub fn player_has_quest_sub_global(&mut self, subname: &str) -> bool {
        match self.global_player_state() {
            LoadState::Resolved(id) => {
                self.registry
                    .backend(id)
                    .has_handler(ScriptKind::GlobalPlayer, &ScriptKey::Singleton, subname)
            }
            _ => false,
        }
    }

    pub fn spell_has_quest_sub(&mut self, spell_id: u32, subname: &str) -> bool {
        match self.spell_state(spell_id) {
            LoadState::Resolved(id) => {
                self.registry
                    .backend(id)
                    .has_handler(ScriptKind::Spell, &ScriptKey::Id(spell_id), subname)
            }
            _ => false,
        }
    }

    pub fn item_has_quest_sub(&mut self, item: &ItemSnapshot, subname: &str) -> bool {
        let key = item_script_key(subname, item);
        match self.item_state(&key) {
            LoadState::Resolved(id) => {
                self.registry
                    .backend(id)
                    .has_handler(ScriptKind::Item, &ScriptKey::Name(key), subname)
            }
            _ => false,
        }
    }

    // ---- event delivery ----------------------------------------------

    /// Deliver an NPC event to the entity-local script and then to the
    /// global NPC script. Global delivery never depends on the local
    /// outcome.
    pub fn event_npc(&mut self, event: QuestEvent, npc_type_id: u32, payload: &EventPayload) {
        self.event_npc_local(event, npc_type_id, payload);
        self.event_npc_global(event, payload);
    }

    pub fn event_npc_local(&mut self, event: QuestEvent, npc_type_id: u32, payload: &EventPayload) {
        if let LoadState::Resolved(id) = self.npc_state(npc_type_id) {
            self.registry.backend_mut(id).dispatch(
                ScriptKind::Npc,
                &ScriptKey::Id(npc_type_id),
                event,
                payload,
            );
        }
    }

    pub fn event_npc_global(&mut self, event: QuestEvent, payload: &EventPayload) {
        if let LoadState::Resolved(id) = self.global_npc_state() {
            self.registry.backend_mut(id).dispatch(
                ScriptKind::GlobalNpc,
                &ScriptKey::Singleton,
                event,
                payload,
            );
        }
    }

    pub fn event_player(&mut self, event: QuestEvent, payload: &EventPayload) {
        self.event_player_local(event, payload);
        self.event_player_global(event, payload);
    }

    pub fn event_player_local(&mut self, event: QuestEvent, payload: &EventPayload) {
        if let LoadState::Resolved(id) = self.player_state() {
            self.registry.backend_mut(id).dispatch(
                ScriptKind::Player,
                &ScriptKey::Singleton,
                event,
                payload,
            );
        }
    }

    pub fn event_player_global(&mut self, event: QuestEvent, payload: &EventPayload) {
        if let LoadState::Resolved(id) = self.global_player_state() {
            self.registry.backend_mut(id).dispatch(
                ScriptKind::GlobalPlayer,
                &ScriptKey::Singleton,
                event,
                payload,
            );
        }
    }

    pub fn event_item(&mut self, event: QuestEvent, item: &ItemSnapshot, payload: &EventPayload) {
        let key = item_script_key(event.name(), item);
        if let LoadState::Resolved(id) = self.item_state(&key) {
            self.registry
                .backend_mut(id)
                .dispatch(ScriptKind::Item, &ScriptKey::Name(key), event, payload);
        }
    }

    pub fn event_spell(&mut self, event: QuestEvent, spell_id: u32, payload: &EventPayload) {
        if let LoadState::Resolved(id) = self.spell_state(spell_id) {
            self.registry
                .backend_mut(id)
                .dispatch(ScriptKind::Spell, &ScriptKey::Id(spell_id), event, payload);
        }
    }

    // ---- per-class resolve-and-load ----------------------------------
    //
    // Each helper implements the four-state protocol for its class: a
    // cached outcome is returned as-is; an unresolved key is resolved,
    // loaded into the winning backend exactly once, and the outcome
    // recorded before it is returned. Failed outcomes stick until reload.

    fn npc_state(&mut self, npc_type_id: u32) -> LoadState {
        let cached = self.npc_status.get(&npc_type_id);
        if cached != LoadState::Unresolved {
            return cached;
        }
        let hit = self.resolver.npc(&self.ctx(), &self.registry, npc_type_id);
        let state = self.load_hit(hit, ScriptKind::Npc, ScriptKey::Id(npc_type_id));
        self.npc_status.set(npc_type_id, state);
        state
    }

    fn global_npc_state(&mut self) -> LoadState {
        let cached = self.global_npc_status.get();
        if cached != LoadState::Unresolved {
            return cached;
        }
        let hit = self.resolver.global_npc(&self.ctx(), &self.registry);
        let state = self.load_hit(hit, ScriptKind::GlobalNpc, ScriptKey::Singleton);
        self.global_npc_status.set(state);
        state
    }

    fn player_state(&mut self) -> LoadState {
        let cached = self.player_status.get();
        if cached != LoadState::Unresolved {
            return cached;
        }
        let hit = self.resolver.player(&self.ctx(), &self.registry);
        let state = self.load_hit(hit, ScriptKind::Player, ScriptKey::Singleton);
        self.player_status.set(state);
        state
    }

    fn global_player_state(&mut self) -> LoadState {
        let cached = self.global_player_status.get();
        if cached != LoadState::Unresolved {
            return cached;
        }
        let hit = self.resolver.global_player(&self.ctx(), &self.registry);
        let state = self.load_hit(hit, ScriptKind::GlobalPlayer, ScriptKey::Singleton);
        self.global_player_status.set(state);
        state
    }

    fn spell_state(&mut self, spell_id: u32) -> LoadState {
        let cached = self.spell_status.get(&spell_id);
        if cached != LoadState::Unresolved {
            return cached;
        }
        let hit = self.resolver.spell(&self.ctx(), &self.registry, spell_id);
        let state = self.load_hit(hit, ScriptKind::Spell, ScriptKey::Id(spell_id));
        self.spell_status.set(spell_id, state);
        state
    }

    fn item_state(&mut self, script_key: &str) -> LoadState {
        let cached = self.item_status.get(script_key);
        if cached != LoadState::Unresolved {
            return cached;
        }
        let hit = self.resolver.item(&self.ctx(), &self.registry, script_key);
        let state = self.load_hit(hit, ScriptKind::Item, ScriptKey::Name(script_key.to_string()));
        self.item_status.set(script_key.to_string(), state);
        state
    }

    fn load_hit(
        &mut self,
        hit: Option<(BackendId, PathBuf)>,
        kind: ScriptKind,
        key: ScriptKey,
    ) -> LoadState {
        match hit {
            Some((id, path)) => {
                self.registry.backend_mut(id).load(kind, &path, &key);
                LoadState::Resolved(id)
            }
            None => LoadState::Failed,
        }
    }

    fn ctx(&self) -> ResolveContext<'_> {
        ResolveContext {
            config: &self.config,
            zone: self.zone.as_ref(),
            npcs: self.npcs.as_ref(),
        }
    }
}
