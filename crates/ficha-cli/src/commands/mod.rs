pub mod character;
pub mod dice;
pub mod gear;
pub mod inventory;
pub mod money;
pub mod progress;
pub mod skill;
pub mod vitals;

use std::fmt::Display;
use std::path::Path;

use ficha_core::{Character, CharacterKey, FileStore, OwnerId};
use ficha_mechanics::{Engine, EngineConfig};

/// The engine plus the player the command runs as.
pub struct Context {
    pub engine: Engine<FileStore>,
    pub owner: OwnerId,
}

impl Context {
    pub fn open(store: &Path, owner: &str, seed: Option<u64>) -> Result<Self, String> {
        let store = FileStore::open(store).map_err(fail)?;
        tracing::debug!(path = %store.path().display(), owner, ?seed, "store opened");
        let mut config = EngineConfig::default();
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        Ok(Self {
            engine: Engine::with_config(store, config),
            owner: OwnerId::from(owner),
        })
    }

    /// The active character, or an error telling the user to pick one.
    pub fn active(&self) -> Result<Character, String> {
        self.engine
            .active_character(&self.owner)
            .map_err(fail)?
            .ok_or_else(|| "no active character (use `ficha use <name>` first)".to_string())
    }

    pub fn active_key(&self) -> Result<CharacterKey, String> {
        self.active().map(|c| c.key())
    }
}

pub fn fail(e: impl Display) -> String {
    e.to_string()
}
