use ficha_core::{Armor, Character, CharacterKey, CharacterStore, Weapon};
use serde::{Deserialize, Serialize};

use super::Engine;
use crate::equipment::{self, ItemAdjustment};
use crate::error::{SheetError, SheetResult};

/// The rows a character currently has equipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipped {
    /// The equipped weapon, if the reference resolves.
    pub weapon: Option<Weapon>,
    /// The equipped armor, if the reference resolves.
    pub armor: Option<Armor>,
}

impl<S: CharacterStore> Engine<S> {
    /// Store a weapon and make it the equipped one. Weapons grant no bonus,
    /// so this only swaps the reference.
    pub fn equip_weapon(&self, key: &CharacterKey, weapon: Weapon) -> SheetResult<Character> {
        equipment::validate_dice(&weapon.name, weapon.dice)?;
        self.exclusive(key, || {
            let mut c = self.load(key)?;
            self.store.upsert_weapon(key, &weapon)?;
            c.equipped_weapon = Some(weapon.name.clone());
            self.store.upsert_character(&c)?;
            tracing::debug!(owner = %key.owner, character = %key.name, weapon = %weapon.name, "weapon equipped");
            Ok(c)
        })
    }

    /// Delete a weapon, unequipping it if it was equipped.
    pub fn remove_weapon(&self, key: &CharacterKey, name: &str) -> SheetResult<Weapon> {
        self.exclusive(key, || {
            let mut c = self.load(key)?;
            let weapon = self
                .find_weapon(key, name)?
                .ok_or_else(|| SheetError::not_found("weapon", name))?;
            self.store.delete_weapon(key, &weapon.name)?;
            if c.equipped_weapon.as_deref() == Some(weapon.name.as_str()) {
                c.equipped_weapon = None;
                self.store.upsert_character(&c)?;
            }
            tracing::debug!(owner = %key.owner, character = %key.name, weapon = %weapon.name, "weapon removed");
            Ok(weapon)
        })
    }

    /// Store an armor and equip it, moving the live dodge/speed bonus from
    /// the previously equipped armor to this one.
    ///
    /// Re-equipping an armor of the same name swaps its old stored bonus
    /// for the new one.
    pub fn equip_armor(&self, key: &CharacterKey, armor: Armor) -> SheetResult<Character> {
        equipment::validate_dice(&armor.name, armor.dice)?;
        equipment::validate_bonus(&armor)?;
        self.exclusive(key, || {
            let mut c = self.load(key)?;
            if let Some(current) = c.equipped_armor.clone() {
                match self.store.armor(key, &current)? {
                    Some(old) => equipment::remove_armor_bonus(&mut c, &old)?,
                    None => tracing::warn!(
                        owner = %key.owner,
                        character = %key.name,
                        armor = %current,
                        "equipped armor row missing, no bonus to remove"
                    ),
                }
            }
            equipment::add_armor_bonus(&mut c, &armor)?;
            self.store.upsert_armor(key, &armor)?;
            c.equipped_armor = Some(armor.name.clone());
            self.store.upsert_character(&c)?;
            tracing::debug!(
                owner = %key.owner,
                character = %key.name,
                armor = %armor.name,
                dodge = c.attributes.dodge,
                speed = c.attributes.speed,
                "armor equipped"
            );
            Ok(c)
        })
    }

    /// Delete an armor. If it was equipped, its bonus leaves the live
    /// scores and the reference is cleared.
    pub fn remove_armor(&self, key: &CharacterKey, name: &str) -> SheetResult<Armor> {
        self.exclusive(key, || {
            let mut c = self.load(key)?;
            let armor = self
                .find_armor(key, name)?
                .ok_or_else(|| SheetError::not_found("armor", name))?;
            let equipped = c.equipped_armor.as_deref() == Some(armor.name.as_str());
            if equipped {
                equipment::remove_armor_bonus(&mut c, &armor)?;
                c.equipped_armor = None;
            }
            self.store.delete_armor(key, &armor.name)?;
            if equipped {
                self.store.upsert_character(&c)?;
            }
            tracing::debug!(owner = %key.owner, character = %key.name, armor = %armor.name, "armor removed");
            Ok(armor)
        })
    }

    /// Upgrade a stored weapon's level and dice.
    pub fn adjust_weapon(
        &self,
        key: &CharacterKey,
        name: &str,
        adjustment: ItemAdjustment,
    ) -> SheetResult<Weapon> {
        self.exclusive(key, || {
            self.load(key)?;
            let mut weapon = self
                .find_weapon(key, name)?
                .ok_or_else(|| SheetError::not_found("weapon", name))?;
            equipment::adjust_weapon(&mut weapon, adjustment)?;
            self.store.upsert_weapon(key, &weapon)?;
            tracing::debug!(owner = %key.owner, character = %key.name, weapon = %weapon, "weapon adjusted");
            Ok(weapon)
        })
    }

    /// Upgrade a stored armor's level, dice and bonus fields.
    ///
    /// The live dodge/speed scores are left alone even if this armor is
    /// equipped; they catch up the next time it is equipped or removed
    /// (removal subtracts the adjusted bonus).
    pub fn adjust_armor(
        &self,
        key: &CharacterKey,
        name: &str,
        adjustment: ItemAdjustment,
    ) -> SheetResult<Armor> {
        self.exclusive(key, || {
            self.load(key)?;
            let mut armor = self
                .find_armor(key, name)?
                .ok_or_else(|| SheetError::not_found("armor", name))?;
            equipment::adjust_armor(&mut armor, adjustment)?;
            self.store.upsert_armor(key, &armor)?;
            tracing::debug!(owner = %key.owner, character = %key.name, armor = %armor, "armor adjusted");
            Ok(armor)
        })
    }

    /// All weapons of a character.
    pub fn weapons(&self, key: &CharacterKey) -> SheetResult<Vec<Weapon>> {
        self.load(key)?;
        Ok(self.store.weapons(key)?)
    }

    /// All armor of a character.
    pub fn armors(&self, key: &CharacterKey) -> SheetResult<Vec<Armor>> {
        self.load(key)?;
        Ok(self.store.armors(key)?)
    }

    /// Resolve the equipped references to their rows.
    pub fn equipped(&self, key: &CharacterKey) -> SheetResult<Equipped> {
        let c = self.load(key)?;
        let weapon = match &c.equipped_weapon {
            Some(name) => self.store.weapon(key, name)?,
            None => None,
        };
        let armor = match &c.equipped_armor {
            Some(name) => self.store.armor(key, name)?,
            None => None,
        };
        Ok(Equipped { weapon, armor })
    }

    /// Exact name first, then case-insensitive.
    fn find_weapon(&self, key: &CharacterKey, name: &str) -> SheetResult<Option<Weapon>> {
        let name = name.trim();
        if let Some(w) = self.store.weapon(key, name)? {
            return Ok(Some(w));
        }
        let needle = name.to_lowercase();
        Ok(self
            .store
            .weapons(key)?
            .into_iter()
            .find(|w| w.name.to_lowercase() == needle))
    }

    fn find_armor(&self, key: &CharacterKey, name: &str) -> SheetResult<Option<Armor>> {
        let name = name.trim();
        if let Some(a) = self.store.armor(key, name)? {
            return Ok(Some(a));
        }
        let needle = name.to_lowercase();
        Ok(self
            .store
            .armors(key)?
            .into_iter()
            .find(|a| a.name.to_lowercase() == needle))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, kael};
    use super::*;
    use proptest::prelude::*;

    fn live(engine: &Engine<ficha_core::MemoryStore>, key: &CharacterKey) -> (i32, i32) {
        let c = engine.character(key).unwrap();
        (c.attributes.dodge, c.attributes.speed)
    }

    #[test]
    fn armor_swap_moves_bonus() {
        let engine = engine();
        let key = kael(&engine);
        assert_eq!(live(&engine, &key), (5, 4));

        engine
            .equip_armor(&key, Armor::new("Couraça", 1, 1).with_bonus(2, 0))
            .unwrap();
        assert_eq!(live(&engine, &key), (7, 4));

        let c = engine
            .equip_armor(&key, Armor::new("Placas", 2, 2).with_bonus(0, 3))
            .unwrap();
        assert_eq!(live(&engine, &key), (5, 7));
        assert_eq!(c.equipped_armor.as_deref(), Some("Placas"));
        assert_eq!(engine.armors(&key).unwrap().len(), 2);
    }

    #[test]
    fn reequipping_same_armor_does_not_stack() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .equip_armor(&key, Armor::new("Couraça", 1, 1).with_bonus(2, 0))
            .unwrap();
        engine
            .equip_armor(&key, Armor::new("Couraça", 1, 1).with_bonus(3, 1))
            .unwrap();
        assert_eq!(live(&engine, &key), (8, 5));
    }

    #[test]
    fn removing_equipped_armor_restores_scores() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .equip_armor(&key, Armor::new("Placas", 1, 1).with_bonus(1, -2))
            .unwrap();
        let removed = engine.remove_armor(&key, "placas").unwrap();
        assert_eq!(removed.name, "Placas");
        assert_eq!(live(&engine, &key), (5, 4));
        assert!(engine.equipped(&key).unwrap().armor.is_none());
        assert!(matches!(
            engine.remove_armor(&key, "Placas"),
            Err(SheetError::NotFound { .. })
        ));
    }

    #[test]
    fn removing_unequipped_armor_keeps_scores() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .equip_armor(&key, Armor::new("A", 1, 1).with_bonus(2, 0))
            .unwrap();
        engine
            .equip_armor(&key, Armor::new("B", 1, 1).with_bonus(0, 1))
            .unwrap();
        engine.remove_armor(&key, "A").unwrap();
        assert_eq!(live(&engine, &key), (5, 5));
        assert_eq!(
            engine.character(&key).unwrap().equipped_armor.as_deref(),
            Some("B")
        );
    }

    #[test]
    fn weapon_equip_and_remove() {
        let engine = engine();
        let key = kael(&engine);
        engine.equip_weapon(&key, Weapon::new("Axe", 1, 2)).unwrap();
        let c = engine.equip_weapon(&key, Weapon::new("Bow", 1, 1)).unwrap();
        assert_eq!(c.equipped_weapon.as_deref(), Some("Bow"));
        assert_eq!(c.attributes, engine.character(&key).unwrap().attributes);

        engine.remove_weapon(&key, "Axe").unwrap();
        assert_eq!(
            engine.character(&key).unwrap().equipped_weapon.as_deref(),
            Some("Bow")
        );
        engine.remove_weapon(&key, "Bow").unwrap();
        assert!(engine.character(&key).unwrap().equipped_weapon.is_none());
        assert!(matches!(
            engine.remove_weapon(&key, "Bow"),
            Err(SheetError::NotFound { .. })
        ));
    }

    #[test]
    fn zero_dice_items_are_rejected() {
        let engine = engine();
        let key = kael(&engine);
        assert!(matches!(
            engine.equip_weapon(&key, Weapon::new("Stick", 0, 0)),
            Err(SheetError::InvalidResult(_))
        ));
        assert!(engine.weapons(&key).unwrap().is_empty());
    }

    #[test]
    fn oversized_bonus_is_rejected_without_side_effects() {
        let engine = engine();
        let key = kael(&engine);
        let err = engine
            .equip_armor(&key, Armor::new("Aegis", 1, 1).with_bonus(i32::MAX, 0))
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidResult(_)));
        assert_eq!(live(&engine, &key), (5, 4));
        assert!(engine.armors(&key).unwrap().is_empty());
        assert!(engine.character(&key).unwrap().equipped_armor.is_none());
    }

    #[test]
    fn adjusting_equipped_armor_leaves_live_scores() {
        let engine = engine();
        let key = kael(&engine);
        engine
            .equip_armor(&key, Armor::new("Couraça", 1, 1).with_bonus(2, 0))
            .unwrap();
        let a = engine
            .adjust_armor(&key, "Couraça", ItemAdjustment::new(1, 1).with_bonus(3, 0))
            .unwrap();
        assert_eq!(a.dodge_bonus, 5);
        assert_eq!(live(&engine, &key), (7, 4));

        let err = engine
            .adjust_armor(&key, "Couraça", ItemAdjustment::new(-5, 0))
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidResult(_)));
    }

    #[test]
    fn adjust_weapon_by_case_insensitive_name() {
        let engine = engine();
        let key = kael(&engine);
        engine.equip_weapon(&key, Weapon::new("Axe", 1, 2)).unwrap();
        let w = engine
            .adjust_weapon(&key, "axe", ItemAdjustment::new(1, -2))
            .unwrap();
        assert_eq!((w.level, w.dice), (2, 0));
        assert!(matches!(
            engine.adjust_weapon(&key, "Sword", ItemAdjustment::new(1, 1)),
            Err(SheetError::NotFound { .. })
        ));
    }

    proptest! {
        #[test]
        fn armor_swap_is_reversible(
            a_dodge in -5i32..6, a_speed in -5i32..6,
            b_dodge in -5i32..6, b_speed in -5i32..6,
        ) {
            let engine = engine();
            let key = kael(&engine);
            let before = live(&engine, &key);
            engine.equip_armor(&key, Armor::new("A", 1, 1).with_bonus(a_dodge, a_speed)).unwrap();
            engine.equip_armor(&key, Armor::new("B", 1, 1).with_bonus(b_dodge, b_speed)).unwrap();
            engine.remove_armor(&key, "B").unwrap();
            prop_assert_eq!(live(&engine, &key), before);
        }
    }
}
