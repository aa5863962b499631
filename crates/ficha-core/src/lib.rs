//! Core records for Ficha: characters, gear, skills, and the character store.
//!
//! This crate defines the persisted shape of a tabletop character sheet and
//! the [`CharacterStore`] collaborator the rules engine reads and writes
//! through. It carries no game rules of its own; leveling, equipment
//! bonuses, currency and dice live in `ficha-mechanics`.

/// Characters, their owners, and the attribute/resistance blocks.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Weapons, armor, and inventory rows owned by a character.
pub mod item;
/// Skills with dice formulas.
pub mod skill;
/// The persistence collaborator and its in-memory and file-backed stores.
pub mod store;
/// Name normalization shared by every parser.
pub mod text;

/// Re-export character types.
pub use character::{
    Attribute, Attributes, Character, CharacterKey, LIFE_PER_CONSTITUTION, MAX_LEVEL,
    NewCharacter, OwnerId, Resistance, Resistances, STAT_MAX, STRESS_MAX, Stat,
};
/// Re-export error types.
pub use error::{StoreError, StoreResult};
/// Re-export item types.
pub use item::{Armor, InventoryItem, Weapon};
/// Re-export skill types.
pub use skill::{Skill, SkillKind};
/// Re-export store types.
pub use store::{CharacterStore, FileStore, MemoryStore};
/// Re-export name folding.
pub use text::fold;
