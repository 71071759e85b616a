use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::BackendId;
use crate::config::QuestConfig;
use crate::registry::BackendRegistry;
use crate::world::{NpcDirectory, ZoneContext};

/// Filesystem existence check, seamed out so tests can observe and count
/// probes.
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Production probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }
}

/// Read-only context resolution runs against. Passed in explicitly so the
/// engine stays testable in isolation; nothing here is ambient state.
pub struct ResolveContext<'a> {
    pub config: &'a QuestConfig,
    pub zone: Option<&'a ZoneContext>,
    pub npcs: &'a dyn NpcDirectory,
}

/// Searches candidate stems against every registered backend's extension,
/// in precedence order, and reports the first file that exists.
pub struct Resolver<P: FileProbe> {
    probe: P,
}

impl<P: FileProbe> Resolver<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Core probe loop: stems outer, backends inner. First hit wins.
    pub fn resolve(
        &self,
        registry: &BackendRegistry,
        stems: &[PathBuf],
    ) -> Option<(BackendId, PathBuf)> {
        for stem in stems {
            for &id in registry.precedence() {
                let candidate = with_extension(stem, registry.extension(id));
                if self.probe.exists(&candidate) {
                    return Some((id, candidate));
                }
            }
        }
        None
    }

    /// NPC-local ladder: zone/npcid, zone/name, templates/npcid,
    /// templates/name, zone/default, templates/default. The display-name
    /// lookup only happens once the id tier has missed; an unknown NPC
    /// type aborts the whole search.
    pub fn npc(
        &self,
        ctx: &ResolveContext<'_>,
        registry: &BackendRegistry,
        npc_type_id: u32,
    ) -> Option<(BackendId, PathBuf)> {
        let zone = ctx.zone?;
        let zone_dir = ctx.config.root.join(&zone.short_name);
        let templates_dir = ctx.config.root.join(&ctx.config.templates_dir);

        let id_stem = npc_type_id.to_string();
        if let Some(hit) = self.resolve(registry, &[zone_dir.join(&id_stem)]) {
            return Some(hit);
        }

        let npc_name = sanitize_npc_name(&ctx.npcs.npc_type_name(npc_type_id)?);

        self.resolve(
            registry,
            &[
                zone_dir.join(&npc_name),
                templates_dir.join(&id_stem),
                templates_dir.join(&npc_name),
                zone_dir.join("default"),
                templates_dir.join("default"),
            ],
        )
    }

    pub fn global_npc(
        &self,
        ctx: &ResolveContext<'_>,
        registry: &BackendRegistry,
    ) -> Option<(BackendId, PathBuf)> {
        let stem = ctx.config.root.join(&ctx.config.templates_dir).join("global_npc");
        self.resolve(registry, &[stem])
    }

    /// Player-local ladder: zone/player_v<instance>, zone/player,
    /// templates/player. No zone context means no probing at all.
    pub fn player(
        &self,
        ctx: &ResolveContext<'_>,
        registry: &BackendRegistry,
    ) -> Option<(BackendId, PathBuf)> {
        let zone = ctx.zone?;
        let zone_dir = ctx.config.root.join(&zone.short_name);
        let templates_dir = ctx.config.root.join(&ctx.config.templates_dir);
        self.resolve(
            registry,
            &[
                zone_dir.join(format!("player_v{}", zone.instance_version)),
                zone_dir.join("player"),
                templates_dir.join("player"),
            ],
        )
    }

    pub fn global_player(
        &self,
        ctx: &ResolveContext<'_>,
        registry: &BackendRegistry,
    ) -> Option<(BackendId, PathBuf)> {
        let stem = ctx.config.root.join(&ctx.config.templates_dir).join("global_player");
        self.resolve(registry, &[stem])
    }

    pub fn spell(
        &self,
        ctx: &ResolveContext<'_>,
        registry: &BackendRegistry,
        spell_id: u32,
    ) -> Option<(BackendId, PathBuf)> {
        let stem = ctx.config.root.join("spells").join(spell_id.to_string());
        self.resolve(registry, &[stem])
    }

    pub fn item(
        &self,
        ctx: &ResolveContext<'_>,
        registry: &BackendRegistry,
        script_key: &str,
    ) -> Option<(BackendId, PathBuf)> {
        let stem = ctx.config.root.join("items").join(script_key);
        self.resolve(registry, &[stem])
    }
}

impl Default for Resolver<FsProbe> {
    fn default() -> Self {
        Self::new(FsProbe)
    }
}

/// NPC display names may contain backticks, which are illegal in script
/// file names; they become hyphens.
pub fn sanitize_npc_name(name: &str) -> String {
    name.replace('`', "-")
}

// Appends ".ext" to the stem as raw text. `Path::set_extension` would
// truncate at any dot already present in an NPC name.
fn with_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut os = stem.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}
