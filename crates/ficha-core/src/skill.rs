use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::fold;

/// Whether a skill hurts or heals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Rolled and reported; damage is applied by hand.
    #[default]
    Damage,
    /// Rolled and applied as healing to the target.
    Heal,
}

impl SkillKind {
    /// Parse a skill kind (case- and accent-insensitive, Portuguese names
    /// accepted).
    pub fn parse(s: &str) -> Option<Self> {
        match fold(s).as_str() {
            "damage" | "dmg" | "attack" | "dano" => Some(Self::Damage),
            "heal" | "healing" | "cure" | "cura" | "curar" | "curacao" => Some(Self::Heal),
            _ => None,
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage => write!(f, "damage"),
            Self::Heal => write!(f, "heal"),
        }
    }
}

/// A named skill with a dice formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Lowercased skill name, unique per character.
    pub name: String,
    /// `XdY` formula, or empty for skills that roll nothing.
    pub formula: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Damage or heal.
    #[serde(default)]
    pub kind: SkillKind,
}

impl Skill {
    /// Create a skill; the name is trimmed and lowercased.
    pub fn new(name: &str, formula: impl Into<String>, kind: SkillKind) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            formula: formula.into(),
            description: String::new(),
            kind,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        self.name.contains(&needle) || self.description.to_lowercase().contains(&needle)
    }
}
