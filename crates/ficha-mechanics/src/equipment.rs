//! Armor bonus transfer and item upgrades.
//!
//! While an armor is equipped its dodge and speed bonuses are folded into
//! the wearer's live scores. Equipping adds them, unequipping subtracts
//! them, so the live scores always carry exactly one armor's bonus.
//! Weapons carry no bonus.

use ficha_core::{Armor, Character, STAT_MAX, Weapon};
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

fn overflow(armor: &Armor, field: &str) -> SheetError {
    SheetError::InvalidResult(format!("{field} would overflow moving the bonus of '{}'", armor.name))
}

/// Fold an armor's bonus into the live scores. Nothing changes on error.
pub fn add_armor_bonus(character: &mut Character, armor: &Armor) -> SheetResult<()> {
    let a = character.attributes;
    let dodge = a.dodge.checked_add(armor.dodge_bonus).ok_or_else(|| overflow(armor, "dodge"))?;
    let speed = a.speed.checked_add(armor.speed_bonus).ok_or_else(|| overflow(armor, "speed"))?;
    character.attributes.dodge = dodge;
    character.attributes.speed = speed;
    Ok(())
}

/// Take an armor's bonus back out of the live scores. Nothing changes on
/// error.
pub fn remove_armor_bonus(character: &mut Character, armor: &Armor) -> SheetResult<()> {
    let a = character.attributes;
    let dodge = a.dodge.checked_sub(armor.dodge_bonus).ok_or_else(|| overflow(armor, "dodge"))?;
    let speed = a.speed.checked_sub(armor.speed_bonus).ok_or_else(|| overflow(armor, "speed"))?;
    character.attributes.dodge = dodge;
    character.attributes.speed = speed;
    Ok(())
}

/// Reject armor bonuses outside `-STAT_MAX..=STAT_MAX`.
pub fn validate_bonus(armor: &Armor) -> SheetResult<()> {
    for (field, value) in [("dodge", armor.dodge_bonus), ("speed", armor.speed_bonus)] {
        if !(-STAT_MAX..=STAT_MAX).contains(&value) {
            return Err(SheetError::InvalidResult(format!(
                "{field} bonus of '{}' must be within ±{STAT_MAX}, got {value}",
                armor.name
            )));
        }
    }
    Ok(())
}

/// Reject items created with no dice.
pub fn validate_dice(name: &str, dice: u32) -> SheetResult<()> {
    if dice == 0 {
        return Err(SheetError::InvalidResult(format!(
            "'{name}' needs at least one die"
        )));
    }
    Ok(())
}

/// Deltas for an item upgrade. Weapons ignore the bonus fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdjustment {
    /// Added to the item level.
    pub level: i32,
    /// Added to the dice count.
    pub dice: i32,
    /// Added to an armor's dodge bonus.
    pub dodge: i32,
    /// Added to an armor's speed bonus.
    pub speed: i32,
}

impl ItemAdjustment {
    /// Level and dice deltas only.
    pub fn new(level: i32, dice: i32) -> Self {
        Self {
            level,
            dice,
            ..Self::default()
        }
    }

    /// Set the armor bonus deltas.
    pub fn with_bonus(mut self, dodge: i32, speed: i32) -> Self {
        self.dodge = dodge;
        self.speed = speed;
        self
    }
}

fn shifted(name: &str, field: &str, current: u32, delta: i32) -> SheetResult<u32> {
    u32::try_from(i64::from(current) + i64::from(delta))
        .map_err(|_| SheetError::InvalidResult(format!("{field} of '{name}' cannot go negative")))
}

/// Apply an upgrade to a weapon. Nothing changes on error.
pub fn adjust_weapon(weapon: &mut Weapon, adjustment: ItemAdjustment) -> SheetResult<()> {
    let level = shifted(&weapon.name, "level", weapon.level, adjustment.level)?;
    let dice = shifted(&weapon.name, "dice", weapon.dice, adjustment.dice)?;
    weapon.level = level;
    weapon.dice = dice;
    Ok(())
}

/// Apply an upgrade to an armor's stored fields. Nothing changes on error.
///
/// The wearer's live scores are not touched, even when this armor is
/// equipped.
pub fn adjust_armor(armor: &mut Armor, adjustment: ItemAdjustment) -> SheetResult<()> {
    let level = shifted(&armor.name, "level", armor.level, adjustment.level)?;
    let dice = shifted(&armor.name, "dice", armor.dice, adjustment.dice)?;
    let mut adjusted = armor.clone();
    adjusted.level = level;
    adjusted.dice = dice;
    adjusted.dodge_bonus = armor.dodge_bonus.saturating_add(adjustment.dodge);
    adjusted.speed_bonus = armor.speed_bonus.saturating_add(adjustment.speed);
    validate_bonus(&adjusted)?;
    *armor = adjusted;
    Ok(())
}
