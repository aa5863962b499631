use ficha_core::{Attribute, CharacterKey, CharacterStore, Resistance};

use super::Engine;
use crate::error::SheetResult;
use crate::progression::{self, LevelOutcome, Progress};

impl<S: CharacterStore> Engine<S> {
    /// Grant experience and run any level-ups. A character at the level
    /// cap is returned unchanged with `AlreadyMax`.
    pub fn apply_experience(&self, key: &CharacterKey, amount: u32) -> SheetResult<Progress> {
        self.update(key, |c| {
            let progress = progression::apply_experience(c, amount);
            match progress.outcome {
                LevelOutcome::LeveledUp { levels } => tracing::info!(
                    owner = %key.owner,
                    character = %key.name,
                    levels,
                    level = progress.level,
                    "level up"
                ),
                _ => tracing::debug!(
                    owner = %key.owner,
                    character = %key.name,
                    amount,
                    xp = progress.xp,
                    outcome = %progress.outcome,
                    "experience applied"
                ),
            }
            Ok(progress)
        })
    }

    /// Spend an attribute point. Returns the new attribute value.
    pub fn spend_attribute_point(&self, key: &CharacterKey, attribute: Attribute) -> SheetResult<i32> {
        self.update(key, |c| {
            let value = progression::spend_attribute_point(c, attribute)?;
            tracing::debug!(owner = %key.owner, character = %key.name, %attribute, value, "attribute point spent");
            Ok(value)
        })
    }

    /// Spend a resistance point. Returns the new resistance value.
    pub fn spend_resistance_point(
        &self,
        key: &CharacterKey,
        resistance: Resistance,
    ) -> SheetResult<i32> {
        self.update(key, |c| {
            let value = progression::spend_resistance_point(c, resistance)?;
            tracing::debug!(owner = %key.owner, character = %key.name, %resistance, value, "resistance point spent");
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, kael};
    use super::*;
    use crate::error::SheetError;
    use ficha_core::character::MAX_LEVEL;

    #[test]
    fn thirty_xp_levels_up_and_persists() {
        let engine = engine();
        let key = kael(&engine);
        let p = engine.apply_experience(&key, 30).unwrap();
        assert_eq!(p.level, 2);
        assert_eq!(p.outcome, LevelOutcome::LeveledUp { levels: 1 });
        let c = engine.character(&key).unwrap();
        assert_eq!((c.level, c.xp), (2, 0));
        assert_eq!(c.attributes.constitution, 11);
        assert_eq!((c.life, c.max_life()), (55, 55));
        assert_eq!((c.attribute_points, c.resistance_points), (1, 1));
    }

    #[test]
    fn cap_is_idempotent() {
        let engine = engine();
        let key = kael(&engine);
        engine.set_level(&key, MAX_LEVEL).unwrap();
        let p = engine.apply_experience(&key, 500).unwrap();
        assert_eq!(p.outcome, LevelOutcome::AlreadyMax);
        assert_eq!(engine.character(&key).unwrap().xp, 0);
    }

    #[test]
    fn spending_requires_points() {
        let engine = engine();
        let key = kael(&engine);
        assert!(matches!(
            engine.spend_attribute_point(&key, Attribute::Constitution),
            Err(SheetError::NoPointsAvailable(_))
        ));
        engine.apply_experience(&key, 30).unwrap();
        assert_eq!(
            engine
                .spend_attribute_point(&key, Attribute::Constitution)
                .unwrap(),
            12
        );
        assert_eq!(engine.character(&key).unwrap().life, 60);
        assert_eq!(
            engine
                .spend_resistance_point(&key, Resistance::Plague)
                .unwrap(),
            1
        );
        assert!(engine
            .spend_resistance_point(&key, Resistance::Plague)
            .is_err());
    }
}
