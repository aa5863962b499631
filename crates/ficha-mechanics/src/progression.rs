//! Experience, level-ups, and point spending.
//!
//! Reaching the threshold for the current level (`25 + level × 5`) levels
//! the character up. Each level grants one constitution (and the five life
//! that comes with it) plus one point in each pool. A single grant may
//! cross several levels; leftover experience carries forward.

use std::fmt;

use ficha_core::character::{LIFE_PER_CONSTITUTION, MAX_LEVEL};
use ficha_core::{Attribute, Character, Resistance, STAT_MAX};
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// Experience needed to leave `level`.
pub fn threshold(level: u32) -> u32 {
    25 + level * 5
}

/// What an experience grant did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    /// One or more levels were gained.
    LeveledUp {
        /// Number of levels gained.
        levels: u32,
    },
    /// Experience was added without crossing a threshold.
    NoLevelUp,
    /// The character was already at the level cap; nothing changed.
    AlreadyMax,
}

impl fmt::Display for LevelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeveledUp { levels: 1 } => write!(f, "leveled up"),
            Self::LeveledUp { levels } => write!(f, "leveled up {levels} times"),
            Self::NoLevelUp => write!(f, "no level up"),
            Self::AlreadyMax => write!(f, "already at max level"),
        }
    }
}

/// The level after an experience grant, with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Level after the grant.
    pub level: u32,
    /// Experience after the grant.
    pub xp: u32,
    /// What happened.
    pub outcome: LevelOutcome,
}

/// Add experience and run the level-up loop.
pub fn apply_experience(character: &mut Character, amount: u32) -> Progress {
    if character.is_max_level() {
        return Progress {
            level: character.level,
            xp: character.xp,
            outcome: LevelOutcome::AlreadyMax,
        };
    }

    character.xp = character.xp.saturating_add(amount);
    let mut levels = 0;
    while character.level < MAX_LEVEL && character.xp >= threshold(character.level) {
        character.xp -= threshold(character.level);
        character.level += 1;
        character.attributes.constitution = character.attributes.constitution.saturating_add(1);
        character.life = character.life.saturating_add(LIFE_PER_CONSTITUTION);
        character.attribute_points += 1;
        character.resistance_points += 1;
        levels += 1;
    }

    let outcome = if levels > 0 {
        LevelOutcome::LeveledUp { levels }
    } else {
        LevelOutcome::NoLevelUp
    };
    Progress {
        level: character.level,
        xp: character.xp,
        outcome,
    }
}

/// Spend one attribute point. Constitution also raises current life by
/// five. Returns the new attribute value.
pub fn spend_attribute_point(character: &mut Character, attribute: Attribute) -> SheetResult<i32> {
    if character.attribute_points == 0 {
        return Err(SheetError::NoPointsAvailable("attribute"));
    }
    let value = raised(attribute, character.attributes.get(attribute))?;
    character.attribute_points -= 1;
    *character.attributes.get_mut(attribute) = value;
    if attribute == Attribute::Constitution {
        character.life = character.life.saturating_add(LIFE_PER_CONSTITUTION);
    }
    Ok(value)
}

/// Spend one resistance point. Returns the new resistance value.
pub fn spend_resistance_point(
    character: &mut Character,
    resistance: Resistance,
) -> SheetResult<i32> {
    if character.resistance_points == 0 {
        return Err(SheetError::NoPointsAvailable("resistance"));
    }
    let value = raised(resistance, character.resistances.get(resistance))?;
    character.resistance_points -= 1;
    *character.resistances.get_mut(resistance) = value;
    Ok(value)
}

/// One point higher, or `InvalidResult` past `STAT_MAX`.
fn raised(stat: impl fmt::Display, value: i32) -> SheetResult<i32> {
    value
        .checked_add(1)
        .filter(|v| *v <= STAT_MAX)
        .ok_or_else(|| SheetError::InvalidResult(format!("{stat} is already at {STAT_MAX}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ficha_core::{Attributes, NewCharacter, OwnerId};
    use proptest::prelude::*;

    fn fresh(constitution: i32) -> Character {
        let request = NewCharacter::named("Kael").with_attributes(Attributes {
            constitution,
            ..Attributes::default()
        });
        Character::new(OwnerId::from("u1"), request, 6)
    }

    #[test]
    fn thirty_xp_at_level_one_levels_up() {
        let mut c = fresh(10);
        let p = apply_experience(&mut c, 30);
        assert_eq!(p.outcome, LevelOutcome::LeveledUp { levels: 1 });
        assert_eq!(c.level, 2);
        assert_eq!(c.xp, 0);
        assert_eq!(c.attributes.constitution, 11);
        assert_eq!(c.life, 55);
        assert_eq!(c.max_life(), 55);
        assert_eq!(c.attribute_points, 1);
        assert_eq!(c.resistance_points, 1);
    }

    #[test]
    fn below_threshold_only_adds_xp() {
        let mut c = fresh(10);
        let p = apply_experience(&mut c, 29);
        assert_eq!(p.outcome, LevelOutcome::NoLevelUp);
        assert_eq!(c.level, 1);
        assert_eq!(c.xp, 29);
    }

    #[test]
    fn large_grant_crosses_several_levels_with_remainder() {
        // 30 (1→2) + 35 (2→3) + 40 (3→4) = 105, 5 left over.
        let mut c = fresh(10);
        let p = apply_experience(&mut c, 110);
        assert_eq!(p.outcome, LevelOutcome::LeveledUp { levels: 3 });
        assert_eq!(c.level, 4);
        assert_eq!(c.xp, 5);
        assert_eq!(c.attributes.constitution, 13);
        assert_eq!(c.life, 65);
        assert_eq!(c.attribute_points, 3);
    }

    #[test]
    fn level_up_keeps_damage_taken() {
        let mut c = fresh(10);
        c.life = 20;
        apply_experience(&mut c, 30);
        assert_eq!(c.life, 25);
    }

    #[test]
    fn max_level_is_unchanged() {
        let mut c = fresh(10);
        c.level = MAX_LEVEL;
        c.xp = 3;
        let before = c.clone();
        let p = apply_experience(&mut c, 1000);
        assert_eq!(p.outcome, LevelOutcome::AlreadyMax);
        assert_eq!(c, before);
    }

    #[test]
    fn grant_stops_at_cap() {
        let mut c = fresh(10);
        c.level = 19;
        let p = apply_experience(&mut c, 10_000);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(c.xp, 10_000 - threshold(19));
    }

    #[test]
    fn spend_points() {
        let mut c = fresh(10);
        assert!(matches!(
            spend_attribute_point(&mut c, Attribute::Force),
            Err(SheetError::NoPointsAvailable(_))
        ));
        c.attribute_points = 2;
        assert_eq!(spend_attribute_point(&mut c, Attribute::Force).unwrap(), 1);
        assert_eq!(c.life, 50);
        assert_eq!(spend_attribute_point(&mut c, Attribute::Constitution).unwrap(), 11);
        assert_eq!(c.life, 55);
        assert_eq!(c.attribute_points, 0);

        assert!(spend_resistance_point(&mut c, Resistance::Stun).is_err());
        c.resistance_points = 1;
        assert_eq!(spend_resistance_point(&mut c, Resistance::Stun).unwrap(), 1);
        assert_eq!(c.resistance_points, 0);
    }

    #[test]
    fn spending_stops_at_stat_ceiling() {
        let mut c = fresh(10);
        c.attribute_points = 1;
        c.resistance_points = 1;
        c.attributes.force = STAT_MAX;
        c.resistances.bleed = STAT_MAX;
        assert!(matches!(
            spend_attribute_point(&mut c, Attribute::Force),
            Err(SheetError::InvalidResult(_))
        ));
        assert!(spend_resistance_point(&mut c, Resistance::Bleed).is_err());
        assert_eq!((c.attribute_points, c.resistance_points), (1, 1));
        assert_eq!(c.attributes.force, STAT_MAX);
    }

    proptest! {
        #[test]
        fn level_never_exceeds_cap(level in 1u32..20, xp in 0u32..60, grants in proptest::collection::vec(0u32..2000, 1..8)) {
            let mut c = fresh(10);
            c.level = level;
            c.xp = xp.min(threshold(level) - 1);
            for amount in grants {
                let before = c.level;
                let p = apply_experience(&mut c, amount);
                prop_assert!(c.level <= MAX_LEVEL);
                prop_assert!(c.level >= before);
                if before == MAX_LEVEL {
                    prop_assert_eq!(p.outcome, LevelOutcome::AlreadyMax);
                    prop_assert_eq!(c.level, MAX_LEVEL);
                }
                if c.level < MAX_LEVEL {
                    prop_assert!(c.xp < threshold(c.level));
                }
            }
        }
    }
}
