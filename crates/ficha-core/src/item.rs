use std::fmt;

use serde::{Deserialize, Serialize};

/// A weapon row. Weapons carry no stat bonus; equipping one only swaps
/// the character's equipped-weapon reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// Item name, unique per character.
    pub name: String,
    /// Weapon level.
    pub level: u32,
    /// Number of d6 rolled for damage.
    pub dice: u32,
}

impl Weapon {
    /// Create a weapon row.
    pub fn new(name: impl Into<String>, level: u32, dice: u32) -> Self {
        Self {
            name: name.into(),
            level,
            dice,
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {} | {}d6 attack)", self.name, self.level, self.dice)
    }
}

/// An armor row. Its dodge/speed bonus is added to the wearer's live
/// scores while equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    /// Item name, unique per character.
    pub name: String,
    /// Armor level.
    pub level: u32,
    /// Number of d6 rolled for defense.
    pub dice: u32,
    /// Dodge bonus granted while equipped.
    #[serde(default)]
    pub dodge_bonus: i32,
    /// Speed bonus granted while equipped.
    #[serde(default)]
    pub speed_bonus: i32,
}

impl Armor {
    /// Create an armor row with no bonuses.
    pub fn new(name: impl Into<String>, level: u32, dice: u32) -> Self {
        Self {
            name: name.into(),
            level,
            dice,
            dodge_bonus: 0,
            speed_bonus: 0,
        }
    }

    /// Set the dodge and speed bonuses.
    pub fn with_bonus(mut self, dodge: i32, speed: i32) -> Self {
        self.dodge_bonus = dodge;
        self.speed_bonus = speed;
        self
    }
}

impl fmt::Display for Armor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {} | {}d6 defense", self.name, self.level, self.dice)?;
        let mut bonuses = Vec::new();
        if self.dodge_bonus != 0 {
            bonuses.push(format!("{:+} dodge", self.dodge_bonus));
        }
        if self.speed_bonus != 0 {
            bonuses.push(format!("{:+} speed", self.speed_bonus));
        }
        if bonuses.is_empty() {
            write!(f, "; no bonus)")
        } else {
            write!(f, "; {})", bonuses.join(" | "))
        }
    }
}

/// A stack of identical items in the bag. Each row occupies one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Lowercased item name.
    pub name: String,
    /// How many are held.
    pub quantity: u32,
}
