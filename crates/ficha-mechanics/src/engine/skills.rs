use ficha_core::{CharacterKey, CharacterStore, Skill, SkillKind};
use serde::{Deserialize, Serialize};

use super::Engine;
use crate::dice::{Formula, RollResult};
use crate::error::{SheetError, SheetResult};
use crate::vitals::{self, LifeChange};

/// Fields to change on an existing skill. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillEdit {
    /// New formula.
    pub formula: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New kind.
    pub kind: Option<SkillKind>,
}

/// What using a skill did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillResolution {
    /// A damage skill: rolled and reported, nothing applied.
    Damage {
        /// The skill used.
        skill: Skill,
        /// The roll, or `None` for a skill without a formula.
        roll: Option<RollResult>,
    },
    /// A heal skill: rolled and applied to the target.
    Heal {
        /// The skill used.
        skill: Skill,
        /// Who was healed.
        target: CharacterKey,
        /// The roll.
        roll: RollResult,
        /// The target's life before and after.
        life: LifeChange,
    },
}

/// Empty formulas are allowed; anything else must parse.
fn validate_formula(formula: &str) -> SheetResult<()> {
    if formula.trim().is_empty() {
        return Ok(());
    }
    Formula::parse(formula).map(|_| ())
}

impl<S: CharacterStore> Engine<S> {
    /// Add or replace a skill. The name is stored lowercased.
    pub fn add_skill(
        &self,
        key: &CharacterKey,
        name: &str,
        formula: &str,
        kind: SkillKind,
        description: &str,
    ) -> SheetResult<Skill> {
        validate_formula(formula)?;
        let skill = Skill::new(name, formula.trim(), kind).with_description(description.trim());
        if skill.name.is_empty() {
            return Err(SheetError::InvalidResult("skill name cannot be empty".to_string()));
        }
        self.exclusive(key, || {
            self.load(key)?;
            self.store.upsert_skill(key, &skill)?;
            tracing::debug!(owner = %key.owner, character = %key.name, skill = %skill.name, "skill saved");
            Ok(skill.clone())
        })
    }

    /// Change fields of an existing skill.
    pub fn edit_skill(&self, key: &CharacterKey, name: &str, edit: SkillEdit) -> SheetResult<Skill> {
        if let Some(formula) = &edit.formula {
            validate_formula(formula)?;
        }
        self.exclusive(key, || {
            let mut skill = self.find_skill(key, name)?;
            if let Some(formula) = edit.formula {
                skill.formula = formula.trim().to_string();
            }
            if let Some(description) = edit.description {
                skill.description = description.trim().to_string();
            }
            if let Some(kind) = edit.kind {
                skill.kind = kind;
            }
            self.store.upsert_skill(key, &skill)?;
            tracing::debug!(owner = %key.owner, character = %key.name, skill = %skill.name, "skill edited");
            Ok(skill)
        })
    }

    /// Delete a skill.
    pub fn remove_skill(&self, key: &CharacterKey, name: &str) -> SheetResult<Skill> {
        self.exclusive(key, || {
            let skill = self.find_skill(key, name)?;
            self.store.delete_skill(key, &skill.name)?;
            tracing::debug!(owner = %key.owner, character = %key.name, skill = %skill.name, "skill removed");
            Ok(skill)
        })
    }

    /// Skills sorted by name, optionally filtered by a substring of the
    /// name or description.
    pub fn skills(&self, key: &CharacterKey, filter: Option<&str>) -> SheetResult<Vec<Skill>> {
        self.load(key)?;
        let mut skills = self.store.skills(key)?;
        if let Some(filter) = filter {
            skills.retain(|s| s.matches(filter));
        }
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    /// Look up one skill.
    pub fn skill(&self, key: &CharacterKey, name: &str) -> SheetResult<Skill> {
        self.find_skill(key, name)
    }

    /// Use a skill.
    ///
    /// A damage skill rolls its formula and reports it. A heal skill rolls
    /// and heals the target, defaulting to the caster. A target name is
    /// looked up among the caster's owner first, then across all owners.
    pub fn resolve_skill(
        &self,
        caster: &CharacterKey,
        name: &str,
        target: Option<&str>,
    ) -> SheetResult<SkillResolution> {
        let skill = self.find_skill(caster, name)?;
        match skill.kind {
            SkillKind::Damage => {
                let roll = if skill.formula.trim().is_empty() {
                    None
                } else {
                    let formula = Formula::parse(&skill.formula)?;
                    Some(self.with_rng(|rng| formula.roll(rng)))
                };
                tracing::debug!(owner = %caster.owner, character = %caster.name, skill = %skill.name, "damage skill rolled");
                Ok(SkillResolution::Damage { skill, roll })
            }
            SkillKind::Heal => {
                let formula = Formula::parse(&skill.formula)?;
                let target = self.resolve_target(caster, target)?;
                let roll = self.with_rng(|rng| formula.roll(rng));
                let amount = u32::try_from(roll.total()).unwrap_or(u32::MAX);
                let life = self.update(&target, |c| Ok(vitals::apply_heal(c, amount)))?;
                tracing::debug!(
                    owner = %caster.owner,
                    character = %caster.name,
                    skill = %skill.name,
                    target = %target,
                    healed = life.after - life.before,
                    "heal skill applied"
                );
                Ok(SkillResolution::Heal {
                    skill,
                    target,
                    roll,
                    life,
                })
            }
        }
    }

    fn resolve_target(&self, caster: &CharacterKey, target: Option<&str>) -> SheetResult<CharacterKey> {
        let Some(name) = target.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(caster.clone());
        };
        // The caster's own party wins over a same-named character elsewhere.
        let own = CharacterKey::new(caster.owner.clone(), name);
        if self.store.character(&own)?.is_some() {
            return Ok(own);
        }
        let needle = name.to_lowercase();
        if let Some(found) = self
            .store
            .characters(&caster.owner)?
            .into_iter()
            .find(|c| c.name.to_lowercase() == needle)
        {
            return Ok(found.key());
        }
        self.store
            .find_character_by_name(name)?
            .map(|found| found.key())
            .ok_or_else(|| SheetError::not_found("character", name))
    }

    fn find_skill(&self, key: &CharacterKey, name: &str) -> SheetResult<Skill> {
        self.load(key)?;
        let name = name.trim().to_lowercase();
        self.store
            .skill(key, &name)?
            .ok_or_else(|| SheetError::not_found("skill", name))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, kael};
    use super::*;
    use ficha_core::{NewCharacter, OwnerId};

    #[test]
    fn add_edit_list_remove() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .add_skill(&key, "Fireball", "3d6", SkillKind::Damage, "Burns foes")
            .unwrap();
        engine
            .add_skill(&key, "Cura Leve", "2d4", SkillKind::Heal, "")
            .unwrap();

        let names: Vec<String> = engine
            .skills(&key, None)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["cura leve", "fireball"]);
        assert_eq!(engine.skills(&key, Some("FOES")).unwrap().len(), 1);

        let edited = engine
            .edit_skill(
                &key,
                "FIREBALL",
                SkillEdit {
                    formula: Some("4d6".to_string()),
                    ..SkillEdit::default()
                },
            )
            .unwrap();
        assert_eq!(edited.formula, "4d6");
        assert_eq!(edited.description, "Burns foes");

        engine.remove_skill(&key, "fireball").unwrap();
        assert!(matches!(
            engine.skill(&key, "fireball"),
            Err(SheetError::NotFound { .. })
        ));
    }

    #[test]
    fn invalid_formula_is_rejected_on_save() {
        let engine = engine();
        let key = kael(&engine);
        assert!(matches!(
            engine.add_skill(&key, "Oops", "2x6", SkillKind::Damage, ""),
            Err(SheetError::InvalidFormula(_))
        ));
        assert!(engine.add_skill(&key, "Shout", "", SkillKind::Damage, "").is_ok());
    }

    #[test]
    fn damage_skill_only_rolls() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .add_skill(&key, "Slash", "2d6", SkillKind::Damage, "")
            .unwrap();
        engine
            .add_skill(&key, "Shout", "", SkillKind::Damage, "")
            .unwrap();
        engine.apply_damage(&key, 10).unwrap();

        match engine.resolve_skill(&key, "slash", None).unwrap() {
            SkillResolution::Damage { roll: Some(roll), .. } => assert_eq!(roll.count(), 2),
            other => panic!("unexpected {other:?}"),
        }
        match engine.resolve_skill(&key, "Shout", None).unwrap() {
            SkillResolution::Damage { roll, .. } => assert!(roll.is_none()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(engine.character(&key).unwrap().life, 40);
    }

    #[test]
    fn heal_skill_defaults_to_caster_and_clamps() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .add_skill(&key, "Mend", "1d4", SkillKind::Heal, "")
            .unwrap();
        engine.apply_damage(&key, 10).unwrap();
        match engine.resolve_skill(&key, "mend", None).unwrap() {
            SkillResolution::Heal { target, roll, life, .. } => {
                assert_eq!(target, key);
                assert_eq!(life.before, 40);
                assert_eq!(i64::from(life.after), 40 + roll.total() as i64);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn heal_skill_targets_other_owner_by_name() {
        let engine = engine();
        let key = kael(&engine);
        let mira = engine
            .create_character(
                &OwnerId::from("u2"),
                NewCharacter::named("Mira").with_attributes(ficha_core::Attributes {
                    constitution: 4,
                    ..ficha_core::Attributes::default()
                }),
            )
            .unwrap()
            .key();
        engine.apply_damage(&mira, 20).unwrap();
        engine
            .add_skill(&key, "Big Heal", "20d6", SkillKind::Heal, "")
            .unwrap();
        match engine.resolve_skill(&key, "big heal", Some("mira")).unwrap() {
            SkillResolution::Heal { target, life, .. } => {
                assert_eq!(target, mira);
                assert_eq!((life.before, life.after, life.max), (0, 20, 20));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            engine.resolve_skill(&key, "big heal", Some("nobody")),
            Err(SheetError::NotFound { .. })
        ));
    }

    #[test]
    fn heal_target_prefers_casters_own_owner() {
        let engine = engine();
        let stranger = engine
            .create_character(&OwnerId::from("u0"), NewCharacter::named("Mira"))
            .unwrap()
            .key();
        let key = kael(&engine);
        let ally = engine
            .create_character(&key.owner, NewCharacter::named("Mira"))
            .unwrap()
            .key();
        engine
            .add_skill(&key, "Mend", "1d4", SkillKind::Heal, "")
            .unwrap();
        for name in ["Mira", "MIRA"] {
            match engine.resolve_skill(&key, "mend", Some(name)).unwrap() {
                SkillResolution::Heal { target, .. } => {
                    assert_eq!(target, ally);
                    assert_ne!(target, stranger);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn missing_skill_is_not_found() {
        let engine = engine();
        let key = kael(&engine);
        assert!(matches!(
            engine.resolve_skill(&key, "nope", None),
            Err(SheetError::NotFound { .. })
        ));
    }
}
