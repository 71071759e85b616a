pub mod backend;
pub mod cache;
pub mod config;
pub mod events;
pub mod registry;
pub mod resolve;
pub mod router;
pub mod scripts;
pub mod world;

pub use backend::{BackendId, ScriptBackend, ScriptKey, ScriptKind};
pub use cache::LoadState;
pub use config::QuestConfig;
pub use events::{EventPayload, QuestEvent};
pub use registry::BackendRegistry;
pub use resolve::{FileProbe, FsProbe, ResolveContext, Resolver};
pub use router::{item_script_key, QuestRouter};
pub use scripts::RhaiBackend;
pub use world::{ItemSnapshot, MobId, NpcDirectory, TimerSink, ZoneContext};
