//! The character state engine.
//!
//! `Engine` is the facade the command layer drives. Every mutating
//! operation runs read, validate, compute and persist under a per-character
//! lock, so two commands on the same character never interleave and
//! commands on different characters never wait on each other. At most one
//! character lock is held at a time.

mod gear;
mod health;
mod items;
mod money;
mod progress;
mod skills;

pub use gear::Equipped;
pub use skills::{SkillEdit, SkillResolution};

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ficha_core::character::MAX_LEVEL;
use ficha_core::{
    Attribute, Character, CharacterKey, CharacterStore, NewCharacter, OwnerId, Stat, StoreError,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::check::{self, CheckResult};
use crate::config::EngineConfig;
use crate::dice::{self, Formula, RollResult};
use crate::error::{SheetError, SheetResult};
use crate::{input, vitals};

/// Invariant-preserving operations over characters held in a store.
pub struct Engine<S> {
    store: S,
    config: EngineConfig,
    rng: Mutex<StdRng>,
    locks: DashMap<CharacterKey, Arc<Mutex<()>>>,
}

impl<S: CharacterStore> Engine<S> {
    /// Create an engine with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            store,
            config,
            rng: Mutex::new(rng),
            locks: DashMap::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run `f` while holding the character's lock.
    ///
    /// Lock entries live only while some caller holds or waits on them, so
    /// the table stays bounded by the number of in-flight operations.
    fn exclusive<T>(&self, key: &CharacterKey, f: impl FnOnce() -> SheetResult<T>) -> SheetResult<T> {
        let lock = Arc::clone(&self.locks.entry(key.clone()).or_default());
        let out = {
            // The lock guards no data, so a poisoned guard is still usable.
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };
        drop(lock);
        // Runs under the shard lock, so no caller can clone the entry between
        // the count check and the removal.
        self.locks.remove_if(key, |_, l| Arc::strong_count(l) == 1);
        out
    }

    /// Load, mutate and persist a character under its lock. Nothing is
    /// written if `f` fails.
    fn update<T>(
        &self,
        key: &CharacterKey,
        f: impl FnOnce(&mut Character) -> SheetResult<T>,
    ) -> SheetResult<T> {
        self.exclusive(key, || {
            let mut character = self.load(key)?;
            let out = f(&mut character)?;
            self.store.upsert_character(&character)?;
            Ok(out)
        })
    }

    fn load(&self, key: &CharacterKey) -> SheetResult<Character> {
        self.store
            .character(key)?
            .ok_or_else(|| SheetError::not_found("character", key.name.clone()))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut *rng)
    }

    // -- lifecycle --

    /// Register a new level-1 character and make it the owner's active one.
    pub fn create_character(&self, owner: &OwnerId, request: NewCharacter) -> SheetResult<Character> {
        input::check_starting_stats(&request.attributes, &request.resistances)?;
        let character = Character::new(owner.clone(), request, self.config.bag_capacity);
        if character.name.is_empty() {
            return Err(SheetError::InvalidResult(
                "character name cannot be empty".to_string(),
            ));
        }
        let key = character.key();
        self.exclusive(&key, || {
            if self.store.character(&key)?.is_some() {
                return Err(SheetError::DuplicateCharacter(key.name.clone()));
            }
            self.store.upsert_character(&character)?;
            self.store.set_active(owner, &character.name)?;
            Ok(())
        })?;
        tracing::info!(owner = %owner, character = %character.name, "character created");
        Ok(character)
    }

    /// Delete a character and everything it owns. The active pointer is
    /// left as is.
    pub fn delete_character(&self, key: &CharacterKey) -> SheetResult<()> {
        self.exclusive(key, || {
            if !self.store.delete_character(key)? {
                return Err(SheetError::not_found("character", key.name.clone()));
            }
            Ok(())
        })?;
        tracing::info!(owner = %key.owner, character = %key.name, "character deleted");
        Ok(())
    }

    /// Rename a character. Its gear, skills and items move with it, and the
    /// owner's active pointer follows if it named the old character.
    pub fn rename_character(&self, key: &CharacterKey, new_name: &str) -> SheetResult<Character> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(SheetError::InvalidResult(
                "character name cannot be empty".to_string(),
            ));
        }
        let renamed = self.exclusive(key, || {
            let character = self.load(key)?;
            if character.name == new_name {
                return Ok(character);
            }
            match self.store.rename_character(key, new_name) {
                Ok(true) => {}
                Ok(false) => return Err(SheetError::not_found("character", key.name.clone())),
                Err(StoreError::NameTaken(name)) => {
                    return Err(SheetError::DuplicateCharacter(name));
                }
                Err(e) => return Err(e.into()),
            }
            self.load(&CharacterKey::new(key.owner.clone(), new_name))
        })?;
        tracing::info!(owner = %key.owner, character = %key.name, new_name = %renamed.name, "character renamed");
        Ok(renamed)
    }

    /// Look up one character.
    pub fn character(&self, key: &CharacterKey) -> SheetResult<Character> {
        self.load(key)
    }

    /// All characters of an owner, sorted by name.
    pub fn characters(&self, owner: &OwnerId) -> SheetResult<Vec<Character>> {
        Ok(self.store.characters(owner)?)
    }

    /// Point the owner at one of their characters. The name is matched
    /// exactly first, then case-insensitively.
    pub fn set_active(&self, owner: &OwnerId, name: &str) -> SheetResult<Character> {
        let name = name.trim();
        let exact = self.store.character(&CharacterKey::new(owner.clone(), name))?;
        let character = match exact {
            Some(c) => c,
            None => {
                let needle = name.to_lowercase();
                self.store
                    .characters(owner)?
                    .into_iter()
                    .find(|c| c.name.to_lowercase() == needle)
                    .ok_or_else(|| SheetError::not_found("character", name))?
            }
        };
        self.store.set_active(owner, &character.name)?;
        tracing::debug!(owner = %owner, character = %character.name, "active character set");
        Ok(character)
    }

    /// The owner's active character. A pointer naming a deleted character
    /// resolves to `None`.
    pub fn active_character(&self, owner: &OwnerId) -> SheetResult<Option<Character>> {
        let Some(name) = self.store.active(owner)? else {
            return Ok(None);
        };
        let character = self.store.character(&CharacterKey::new(owner.clone(), name.clone()))?;
        if character.is_none() {
            tracing::warn!(owner = %owner, character = %name, "active pointer names a missing character");
        }
        Ok(character)
    }

    /// Clear the owner's active pointer. Returns false if none was set.
    pub fn clear_active(&self, owner: &OwnerId) -> SheetResult<bool> {
        Ok(self.store.clear_active(owner)?)
    }

    /// Overwrite one attribute or resistance. Changing constitution moves
    /// current life by five per point.
    pub fn edit_stat(&self, key: &CharacterKey, stat: Stat, value: i32) -> SheetResult<Character> {
        let value = input::check_stat_value(stat, value)?;
        self.update(key, |c| {
            let old = c.stat(stat);
            *c.stat_mut(stat) = value;
            if stat == Stat::Attribute(Attribute::Constitution) {
                vitals::shift_life_for_constitution(c, value.saturating_sub(old));
            }
            tracing::debug!(owner = %key.owner, character = %key.name, %stat, old, value, "stat edited");
            Ok(c.clone())
        })
    }

    /// Set the level directly. Experience resets to zero.
    pub fn set_level(&self, key: &CharacterKey, level: u32) -> SheetResult<Character> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(SheetError::LevelOutOfRange(level));
        }
        self.update(key, |c| {
            c.level = level;
            c.xp = 0;
            tracing::debug!(owner = %key.owner, character = %key.name, level, "level set");
            Ok(c.clone())
        })
    }

    /// Set or clear the portrait URL.
    pub fn set_portrait(&self, key: &CharacterKey, url: Option<String>) -> SheetResult<Character> {
        self.update(key, |c| {
            c.portrait_url = url;
            Ok(c.clone())
        })
    }

    // -- dice --

    /// Parse and roll an `XdY` formula.
    pub fn roll(&self, formula: &str) -> SheetResult<RollResult> {
        let formula = Formula::parse(formula)?;
        Ok(self.with_rng(|rng| formula.roll(rng)))
    }

    /// Roll `count` dice of `faces` faces.
    pub fn roll_dice(&self, count: u32, faces: u32) -> RollResult {
        self.with_rng(|rng| dice::roll(count, faces, rng))
    }

    /// Roll a d20 check against a stat plus a temporary bonus.
    pub fn check(&self, key: &CharacterKey, stat: Stat, bonus: i32) -> SheetResult<CheckResult> {
        let character = self.load(key)?;
        let result = self.with_rng(|rng| check::roll_check(character.stat(stat), bonus, rng));
        tracing::debug!(
            owner = %key.owner,
            character = %key.name,
            %stat,
            roll = result.roll,
            target = result.target,
            outcome = %result.outcome,
            "check rolled"
        );
        Ok(result)
    }
}
