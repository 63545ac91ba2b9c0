//! Engine configuration loaded from `paths.toml`.
//!
//! Every key is optional. A missing or unreadable file, or one that describes
//! an invalid player, falls back to the built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use paths_data::{Goal, Player, ValidationError};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "paths.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Goals every new game is played towards.
    pub goals: Vec<Goal>,
    pub library: LibraryConfig,
    pub player: PlayerConfig,
    pub display: DisplayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            goals: vec![Goal::Health(1)],
            library: LibraryConfig::default(),
            player: PlayerConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Story and save directories, relative to the data root unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub stories_dir: String,
    pub saves_dir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            stories_dir: "stories".to_string(),
            saves_dir: "saves".to_string(),
        }
    }
}

/// The player a new game starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub health: u32,
    pub score: u32,
    pub gold: u32,
    pub inventory: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            name: "Wanderer".to_string(),
            health: 100,
            score: 0,
            gold: 0,
            inventory: Vec::new(),
        }
    }
}

impl PlayerConfig {
    /// # Errors
    /// - if any configured value is out of bounds
    pub fn to_player(&self) -> Result<Player, ValidationError> {
        Player::new(&self.name, self.health, self.score, self.gold)?.with_inventory(self.inventory.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Column to wrap passage text at; 0 uses the terminal width.
    pub wrap_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { wrap_width: 80 }
    }
}

/// Load configuration from `toml_path`, falling back to defaults on any error.
pub fn load_config(toml_path: &Path) -> EngineConfig {
    match try_load_config(toml_path) {
        Ok(config) => {
            info!(
                "configuration loaded from '{}' ({} goal(s))",
                toml_path.display(),
                config.goals.len()
            );
            config
        },
        Err(e) => {
            warn!(
                "Could not load configuration from '{}': {e:#}. Using built-in defaults.",
                toml_path.display()
            );
            EngineConfig::default()
        },
    }
}

fn try_load_config(toml_path: &Path) -> Result<EngineConfig> {
    let raw = fs::read_to_string(toml_path)
        .with_context(|| format!("reading configuration from '{}'", toml_path.display()))?;
    let config: EngineConfig =
        toml::from_str(&raw).with_context(|| format!("parsing configuration from '{}'", toml_path.display()))?;
    config.player.to_player().context("checking [player] defaults")?;
    Ok(config)
}
