use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Layout of the quest script tree on disk. The router only ever reads
/// from it.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestConfig {
    /// Directory the whole quest tree lives under.
    #[serde(default = "QuestConfig::default_root")]
    pub root: PathBuf,
    /// Subdirectory holding fallback templates shared across zones.
    #[serde(default = "QuestConfig::default_templates_dir")]
    pub templates_dir: String,
}

impl QuestConfig {
    fn default_root() -> PathBuf {
        PathBuf::from("quests")
    }

    fn default_templates_dir() -> String {
        "templates".to_string()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read quest config {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse quest config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[quests] config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self { root: Self::default_root(), templates_dir: Self::default_templates_dir() }
    }
}
