use ficha_core::{CharacterKey, CharacterStore};

use super::Engine;
use crate::error::SheetResult;
use crate::vitals::{self, LifeChange, StressChange};

impl<S: CharacterStore> Engine<S> {
    /// Subtract life, stopping at zero.
    pub fn apply_damage(&self, key: &CharacterKey, amount: u32) -> SheetResult<LifeChange> {
        self.update(key, |c| {
            let change = vitals::apply_damage(c, amount);
            tracing::debug!(owner = %key.owner, character = %key.name, amount, life = change.after, "damage applied");
            Ok(change)
        })
    }

    /// Add life, stopping at the maximum.
    pub fn apply_heal(&self, key: &CharacterKey, amount: u32) -> SheetResult<LifeChange> {
        self.update(key, |c| {
            let change = vitals::apply_heal(c, amount);
            tracing::debug!(owner = %key.owner, character = %key.name, amount, life = change.after, "heal applied");
            Ok(change)
        })
    }

    /// Shift stress within `0..=200`. The result flags reaching the ceiling.
    pub fn adjust_stress(&self, key: &CharacterKey, delta: i32) -> SheetResult<StressChange> {
        self.update(key, |c| {
            let change = vitals::adjust_stress(c, delta);
            if change.reached_limit {
                tracing::info!(owner = %key.owner, character = %key.name, "stress limit reached");
            } else {
                tracing::debug!(owner = %key.owner, character = %key.name, delta, stress = change.after, "stress adjusted");
            }
            Ok(change)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, kael};

    #[test]
    fn damage_heal_and_stress_persist() {
        let engine = engine();
        let key = kael(&engine);
        let hit = engine.apply_damage(&key, 80).unwrap();
        assert_eq!((hit.before, hit.after), (50, 0));
        let healed = engine.apply_heal(&key, 7).unwrap();
        assert_eq!(healed.after, 7);
        assert_eq!(engine.character(&key).unwrap().life, 7);

        let s = engine.adjust_stress(&key, 250).unwrap();
        assert_eq!(s.after, 200);
        assert!(s.reached_limit);
        let s = engine.adjust_stress(&key, -50).unwrap();
        assert_eq!(s.after, 150);
        assert_eq!(engine.character(&key).unwrap().stress, 150);
    }
}
