//! Life and stress.
//!
//! Both are clamped tracks: life runs from 0 to the constitution-derived
//! maximum, stress from 0 to 200. Reaching the stress ceiling is reported
//! so the caller can act on it.

use ficha_core::Character;
use ficha_core::character::STRESS_MAX;
use serde::{Deserialize, Serialize};

/// A clamped numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Current value.
    pub current: i32,
    /// Minimum value.
    pub min: i32,
    /// Maximum value.
    pub max: i32,
}

impl Track {
    /// Create a track, clamping the starting value into range.
    pub fn new(current: i32, min: i32, max: i32) -> Self {
        let max = max.max(min);
        Self {
            current: current.clamp(min, max),
            min,
            max,
        }
    }

    /// Adjust by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self.current.saturating_add(delta).clamp(self.min, self.max);
        self.current
    }

    /// Returns true if the track is at its maximum value.
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

/// Life before and after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeChange {
    /// Life before.
    pub before: i32,
    /// Life after.
    pub after: i32,
    /// Maximum life.
    pub max: i32,
}

/// Stress before and after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressChange {
    /// Stress before.
    pub before: i32,
    /// Stress after.
    pub after: i32,
    /// True if a positive change left stress at the ceiling.
    pub reached_limit: bool,
}

fn life_track(character: &Character) -> Track {
    Track::new(character.life, 0, character.max_life())
}

fn change_life(character: &mut Character, delta: i32) -> LifeChange {
    let before = character.life;
    let mut track = life_track(character);
    let after = track.adjust(delta);
    character.life = after;
    LifeChange {
        before,
        after,
        max: track.max,
    }
}

/// Subtract life, stopping at zero.
pub fn apply_damage(character: &mut Character, amount: u32) -> LifeChange {
    change_life(character, -saturate(amount))
}

/// Add life, stopping at the maximum.
pub fn apply_heal(character: &mut Character, amount: u32) -> LifeChange {
    change_life(character, saturate(amount))
}

/// Shift stress by a signed delta within `0..=200`.
pub fn adjust_stress(character: &mut Character, delta: i32) -> StressChange {
    let before = character.stress;
    let mut track = Track::new(character.stress, 0, STRESS_MAX);
    let after = track.adjust(delta);
    character.stress = after;
    StressChange {
        before,
        after,
        reached_limit: delta > 0 && track.is_full(),
    }
}

/// Move current life by `delta` points of constitution, stopping at zero.
/// Used when constitution is edited by hand.
pub fn shift_life_for_constitution(character: &mut Character, delta: i32) {
    let shift = delta.saturating_mul(ficha_core::character::LIFE_PER_CONSTITUTION);
    character.life = character
        .life
        .saturating_add(shift)
        .clamp(0, character.max_life().max(0));
}

fn saturate(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
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
    fn track_clamps() {
        let mut t = Track::new(5, 0, 10);
        assert_eq!(t.adjust(20), 10);
        assert!(t.is_full());
        assert_eq!(t.adjust(-30), 0);
        assert!(!t.is_full());
        assert_eq!(Track::new(100, 0, 10).current, 10);
    }

    #[test]
    fn damage_and_heal_clamp() {
        let mut c = fresh(10);
        let hit = apply_damage(&mut c, 70);
        assert_eq!((hit.before, hit.after, hit.max), (50, 0, 50));
        let healed = apply_heal(&mut c, 12);
        assert_eq!(healed.after, 12);
        let healed = apply_heal(&mut c, 1000);
        assert_eq!(healed.after, 50);
    }

    #[test]
    fn stress_limit_is_reported_on_increase_only() {
        let mut c = fresh(10);
        let s = adjust_stress(&mut c, 150);
        assert!(!s.reached_limit);
        let s = adjust_stress(&mut c, 80);
        assert_eq!(s.after, 200);
        assert!(s.reached_limit);
        let s = adjust_stress(&mut c, -10);
        assert!(!s.reached_limit);
        let s = adjust_stress(&mut c, -500);
        assert_eq!(s.after, 0);
    }

    #[test]
    fn constitution_edit_moves_life() {
        let mut c = fresh(10);
        c.attributes.constitution = 12;
        shift_life_for_constitution(&mut c, 2);
        assert_eq!(c.life, 60);
        c.attributes.constitution = 1;
        shift_life_for_constitution(&mut c, -11);
        assert_eq!(c.life, 5);
    }

    proptest! {
        #[test]
        fn life_stays_in_bounds(con in 0i32..40, ops in proptest::collection::vec((any::<bool>(), 0u32..500), 0..30)) {
            let mut c = fresh(con);
            for (heal, amount) in ops {
                if heal {
                    apply_heal(&mut c, amount);
                } else {
                    apply_damage(&mut c, amount);
                }
                prop_assert!(c.life >= 0);
                prop_assert!(c.life <= c.attributes.constitution * 5);
            }
        }
    }
}
