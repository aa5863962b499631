//! The persistence collaborator consumed by the rules engine.
//!
//! A [`CharacterStore`] offers lookup by `(owner, name)`, idempotent upserts,
//! cascading character deletion, and the per-owner active pointer. How it
//! stores rows is its own business; [`MemoryStore`] keeps them in process
//! and [`FileStore`] mirrors them to a JSON snapshot.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::character::{Character, CharacterKey, OwnerId};
use crate::error::StoreResult;
use crate::item::{Armor, InventoryItem, Weapon};
use crate::skill::Skill;

/// Row-level access to characters and everything they own.
///
/// Upserts are insert-or-replace by key. Writing an owned row for a
/// character that does not exist fails with
/// [`StoreError::MissingParent`](crate::StoreError::MissingParent).
pub trait CharacterStore: Send + Sync {
    /// Look up a character by key.
    fn character(&self, key: &CharacterKey) -> StoreResult<Option<Character>>;

    /// All characters of one owner, sorted by name.
    fn characters(&self, owner: &OwnerId) -> StoreResult<Vec<Character>>;

    /// Find a character of any owner by name, case-insensitively.
    fn find_character_by_name(&self, name: &str) -> StoreResult<Option<Character>>;

    /// Insert or replace a character row. Owned rows are kept.
    fn upsert_character(&self, character: &Character) -> StoreResult<()>;

    /// Delete a character with its weapons, armor, skills and inventory.
    /// The owner's active pointer is left untouched. Returns false if no
    /// such character existed.
    fn delete_character(&self, key: &CharacterKey) -> StoreResult<bool>;

    /// Move a character and every row it owns to `new_name` under the same
    /// owner. An active pointer naming the old character follows it.
    /// Returns false if no such character existed; fails with
    /// [`StoreError::NameTaken`](crate::StoreError::NameTaken) if another
    /// character already holds `new_name`.
    fn rename_character(&self, key: &CharacterKey, new_name: &str) -> StoreResult<bool>;

    /// Look up a weapon row.
    fn weapon(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Weapon>>;

    /// All weapon rows of a character.
    fn weapons(&self, key: &CharacterKey) -> StoreResult<Vec<Weapon>>;

    /// Insert or replace a weapon row by name.
    fn upsert_weapon(&self, key: &CharacterKey, weapon: &Weapon) -> StoreResult<()>;

    /// Delete a weapon row. Returns false if it did not exist.
    fn delete_weapon(&self, key: &CharacterKey, name: &str) -> StoreResult<bool>;

    /// Look up an armor row.
    fn armor(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Armor>>;

    /// All armor rows of a character.
    fn armors(&self, key: &CharacterKey) -> StoreResult<Vec<Armor>>;

    /// Insert or replace an armor row by name.
    fn upsert_armor(&self, key: &CharacterKey, armor: &Armor) -> StoreResult<()>;

    /// Delete an armor row. Returns false if it did not exist.
    fn delete_armor(&self, key: &CharacterKey, name: &str) -> StoreResult<bool>;

    /// Look up a skill row.
    fn skill(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Skill>>;

    /// All skill rows of a character, sorted by name.
    fn skills(&self, key: &CharacterKey) -> StoreResult<Vec<Skill>>;

    /// Insert or replace a skill row by name.
    fn upsert_skill(&self, key: &CharacterKey, skill: &Skill) -> StoreResult<()>;

    /// Delete a skill row. Returns false if it did not exist.
    fn delete_skill(&self, key: &CharacterKey, name: &str) -> StoreResult<bool>;

    /// Look up an inventory row.
    fn item(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<InventoryItem>>;

    /// All inventory rows of a character, sorted by name.
    fn inventory(&self, key: &CharacterKey) -> StoreResult<Vec<InventoryItem>>;

    /// Insert or replace an inventory row by name.
    fn upsert_item(&self, key: &CharacterKey, item: &InventoryItem) -> StoreResult<()>;

    /// Delete an inventory row. Returns false if it did not exist.
    fn delete_item(&self, key: &CharacterKey, name: &str) -> StoreResult<bool>;

    /// The character name the owner's active pointer holds, if any. The
    /// name may refer to a deleted character.
    fn active(&self, owner: &OwnerId) -> StoreResult<Option<String>>;

    /// Point the owner's active pointer at a character name.
    fn set_active(&self, owner: &OwnerId, name: &str) -> StoreResult<()>;

    /// Clear the owner's active pointer. Returns false if none was set.
    fn clear_active(&self, owner: &OwnerId) -> StoreResult<bool>;
}
