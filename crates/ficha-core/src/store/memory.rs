use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::CharacterStore;
use crate::character::{Character, CharacterKey, OwnerId};
use crate::error::{StoreError, StoreResult};
use crate::item::{Armor, InventoryItem, Weapon};
use crate::skill::Skill;

/// A character row together with every row it owns. Deleting the sheet is
/// the cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Sheet {
    pub(crate) character: Character,
    #[serde(default)]
    pub(crate) weapons: BTreeMap<String, Weapon>,
    #[serde(default)]
    pub(crate) armors: BTreeMap<String, Armor>,
    #[serde(default)]
    pub(crate) skills: BTreeMap<String, Skill>,
    #[serde(default)]
    pub(crate) inventory: BTreeMap<String, InventoryItem>,
}

impl Sheet {
    fn new(character: Character) -> Self {
        Self {
            character,
            weapons: BTreeMap::new(),
            armors: BTreeMap::new(),
            skills: BTreeMap::new(),
            inventory: BTreeMap::new(),
        }
    }
}

/// All tables, keyed owner → character name → sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Tables {
    #[serde(default)]
    pub(crate) sheets: BTreeMap<String, BTreeMap<String, Sheet>>,
    #[serde(default)]
    pub(crate) active: BTreeMap<String, String>,
}

impl Tables {
    fn sheet(&self, key: &CharacterKey) -> Option<&Sheet> {
        self.sheets.get(key.owner.as_str())?.get(&key.name)
    }

    fn sheet_mut(&mut self, key: &CharacterKey) -> StoreResult<&mut Sheet> {
        self.sheets
            .get_mut(key.owner.as_str())
            .and_then(|sheets| sheets.get_mut(&key.name))
            .ok_or_else(|| StoreError::MissingParent(key.to_string()))
    }
}

/// An in-process store. Cheap to create; used directly in tests and as the
/// table layer underneath [`FileStore`](super::FileStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Clone the current tables.
    pub(crate) fn tables(&self) -> StoreResult<Tables> {
        self.read(Tables::clone)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> StoreResult<T> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&tables))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> StoreResult<T>) -> StoreResult<T> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut tables)
    }

    fn owned<T: Clone>(
        &self,
        key: &CharacterKey,
        name: &str,
        table: fn(&Sheet) -> &BTreeMap<String, T>,
    ) -> StoreResult<Option<T>> {
        self.read(|t| t.sheet(key).and_then(|s| table(s).get(name).cloned()))
    }

    fn owned_all<T: Clone>(
        &self,
        key: &CharacterKey,
        table: fn(&Sheet) -> &BTreeMap<String, T>,
    ) -> StoreResult<Vec<T>> {
        self.read(|t| {
            t.sheet(key)
                .map(|s| table(s).values().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn owned_upsert<T: Clone>(
        &self,
        key: &CharacterKey,
        name: &str,
        row: &T,
        table: fn(&mut Sheet) -> &mut BTreeMap<String, T>,
    ) -> StoreResult<()> {
        self.write(|t| {
            let sheet = t.sheet_mut(key)?;
            table(sheet).insert(name.to_string(), row.clone());
            Ok(())
        })
    }

    fn owned_delete<T>(
        &self,
        key: &CharacterKey,
        name: &str,
        table: fn(&mut Sheet) -> &mut BTreeMap<String, T>,
    ) -> StoreResult<bool> {
        self.write(|t| match t.sheet_mut(key) {
            Ok(sheet) => Ok(table(sheet).remove(name).is_some()),
            Err(_) => Ok(false),
        })
    }
}

impl CharacterStore for MemoryStore {
    fn character(&self, key: &CharacterKey) -> StoreResult<Option<Character>> {
        self.read(|t| t.sheet(key).map(|s| s.character.clone()))
    }

    fn characters(&self, owner: &OwnerId) -> StoreResult<Vec<Character>> {
        self.read(|t| {
            t.sheets
                .get(owner.as_str())
                .map(|sheets| sheets.values().map(|s| s.character.clone()).collect())
                .unwrap_or_default()
        })
    }

    fn find_character_by_name(&self, name: &str) -> StoreResult<Option<Character>> {
        let needle = name.trim().to_lowercase();
        self.read(|t| {
            t.sheets
                .values()
                .flat_map(|sheets| sheets.values())
                .find(|s| s.character.name.to_lowercase() == needle)
                .map(|s| s.character.clone())
        })
    }

    fn upsert_character(&self, character: &Character) -> StoreResult<()> {
        self.write(|t| {
            let sheets = t.sheets.entry(character.owner.0.clone()).or_default();
            match sheets.get_mut(&character.name) {
                Some(sheet) => sheet.character = character.clone(),
                None => {
                    sheets.insert(character.name.clone(), Sheet::new(character.clone()));
                }
            }
            Ok(())
        })
    }

    fn delete_character(&self, key: &CharacterKey) -> StoreResult<bool> {
        self.write(|t| {
            let Some(sheets) = t.sheets.get_mut(key.owner.as_str()) else {
                return Ok(false);
            };
            let removed = sheets.remove(&key.name).is_some();
            if sheets.is_empty() {
                t.sheets.remove(key.owner.as_str());
            }
            Ok(removed)
        })
    }

    fn rename_character(&self, key: &CharacterKey, new_name: &str) -> StoreResult<bool> {
        self.write(|t| {
            let Some(sheets) = t.sheets.get_mut(key.owner.as_str()) else {
                return Ok(false);
            };
            if new_name != key.name && sheets.contains_key(new_name) {
                return Err(StoreError::NameTaken(new_name.to_string()));
            }
            let Some(mut sheet) = sheets.remove(&key.name) else {
                return Ok(false);
            };
            sheet.character.name = new_name.to_string();
            sheets.insert(new_name.to_string(), sheet);
            if t.active.get(key.owner.as_str()) == Some(&key.name) {
                t.active.insert(key.owner.0.clone(), new_name.to_string());
            }
            Ok(true)
        })
    }

    fn weapon(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Weapon>> {
        self.owned(key, name, |s| &s.weapons)
    }

    fn weapons(&self, key: &CharacterKey) -> StoreResult<Vec<Weapon>> {
        self.owned_all(key, |s| &s.weapons)
    }

    fn upsert_weapon(&self, key: &CharacterKey, weapon: &Weapon) -> StoreResult<()> {
        self.owned_upsert(key, &weapon.name, weapon, |s| &mut s.weapons)
    }

    fn delete_weapon(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        self.owned_delete(key, name, |s| &mut s.weapons)
    }

    fn armor(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Armor>> {
        self.owned(key, name, |s| &s.armors)
    }

    fn armors(&self, key: &CharacterKey) -> StoreResult<Vec<Armor>> {
        self.owned_all(key, |s| &s.armors)
    }

    fn upsert_armor(&self, key: &CharacterKey, armor: &Armor) -> StoreResult<()> {
        self.owned_upsert(key, &armor.name, armor, |s| &mut s.armors)
    }

    fn delete_armor(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        self.owned_delete(key, name, |s| &mut s.armors)
    }

    fn skill(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Skill>> {
        self.owned(key, name, |s| &s.skills)
    }

    fn skills(&self, key: &CharacterKey) -> StoreResult<Vec<Skill>> {
        self.owned_all(key, |s| &s.skills)
    }

    fn upsert_skill(&self, key: &CharacterKey, skill: &Skill) -> StoreResult<()> {
        self.owned_upsert(key, &skill.name, skill, |s| &mut s.skills)
    }

    fn delete_skill(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        self.owned_delete(key, name, |s| &mut s.skills)
    }

    fn item(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<InventoryItem>> {
        self.owned(key, name, |s| &s.inventory)
    }

    fn inventory(&self, key: &CharacterKey) -> StoreResult<Vec<InventoryItem>> {
        self.owned_all(key, |s| &s.inventory)
    }

    fn upsert_item(&self, key: &CharacterKey, item: &InventoryItem) -> StoreResult<()> {
        self.owned_upsert(key, &item.name, item, |s| &mut s.inventory)
    }

    fn delete_item(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        self.owned_delete(key, name, |s| &mut s.inventory)
    }

    fn active(&self, owner: &OwnerId) -> StoreResult<Option<String>> {
        self.read(|t| t.active.get(owner.as_str()).cloned())
    }

    fn set_active(&self, owner: &OwnerId, name: &str) -> StoreResult<()> {
        self.write(|t| {
            t.active.insert(owner.0.clone(), name.to_string());
            Ok(())
        })
    }

    fn clear_active(&self, owner: &OwnerId) -> StoreResult<bool> {
        self.write(|t| Ok(t.active.remove(owner.as_str()).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{DEFAULT_BAG_CAPACITY, NewCharacter};
    use crate::skill::SkillKind;

    fn store_with(name: &str) -> (MemoryStore, CharacterKey) {
        let store = MemoryStore::new();
        let c = Character::new(
            OwnerId::from("u1"),
            NewCharacter::named(name),
            DEFAULT_BAG_CAPACITY,
        );
        store.upsert_character(&c).unwrap();
        (store, c.key())
    }

    #[test]
    fn upsert_and_get_character() {
        let (store, key) = store_with("Kael");
        let c = store.character(&key).unwrap().unwrap();
        assert_eq!(c.name, "Kael");
        assert!(store.character(&CharacterKey::new("u1", "Nope")).unwrap().is_none());
    }

    #[test]
    fn upsert_character_keeps_owned_rows() {
        let (store, key) = store_with("Kael");
        store.upsert_weapon(&key, &Weapon::new("Axe", 1, 2)).unwrap();
        let mut c = store.character(&key).unwrap().unwrap();
        c.xp = 10;
        store.upsert_character(&c).unwrap();
        assert_eq!(store.character(&key).unwrap().unwrap().xp, 10);
        assert_eq!(store.weapons(&key).unwrap().len(), 1);
    }

    #[test]
    fn owned_row_without_character_is_rejected() {
        let store = MemoryStore::new();
        let key = CharacterKey::new("u1", "Ghost");
        let err = store.upsert_armor(&key, &Armor::new("Plate", 1, 1)).unwrap_err();
        assert!(matches!(err, StoreError::MissingParent(_)));
    }

    #[test]
    fn delete_cascades_but_keeps_active_pointer() {
        let (store, key) = store_with("Kael");
        store.upsert_weapon(&key, &Weapon::new("Axe", 1, 2)).unwrap();
        store.upsert_armor(&key, &Armor::new("Plate", 1, 1)).unwrap();
        store
            .upsert_skill(&key, &Skill::new("Bash", "1d6", SkillKind::Damage))
            .unwrap();
        store
            .upsert_item(
                &key,
                &InventoryItem {
                    name: "potion".to_string(),
                    quantity: 2,
                },
            )
            .unwrap();
        store.set_active(&key.owner, &key.name).unwrap();

        assert!(store.delete_character(&key).unwrap());
        assert!(store.character(&key).unwrap().is_none());
        assert!(store.weapons(&key).unwrap().is_empty());
        assert!(store.armors(&key).unwrap().is_empty());
        assert!(store.skills(&key).unwrap().is_empty());
        assert!(store.inventory(&key).unwrap().is_empty());
        assert_eq!(store.active(&key.owner).unwrap().as_deref(), Some("Kael"));
        assert!(!store.delete_character(&key).unwrap());
    }

    #[test]
    fn rename_moves_owned_rows_and_active_pointer() {
        let (store, key) = store_with("Kael");
        store.upsert_weapon(&key, &Weapon::new("Axe", 1, 2)).unwrap();
        store.set_active(&key.owner, "Kael").unwrap();

        assert!(store.rename_character(&key, "Kael Stormborn").unwrap());
        let renamed = CharacterKey::new("u1", "Kael Stormborn");
        assert!(store.character(&key).unwrap().is_none());
        assert_eq!(store.character(&renamed).unwrap().unwrap().name, "Kael Stormborn");
        assert_eq!(store.weapons(&renamed).unwrap().len(), 1);
        assert_eq!(
            store.active(&key.owner).unwrap().as_deref(),
            Some("Kael Stormborn")
        );
        assert!(!store.rename_character(&key, "Other").unwrap());
    }

    #[test]
    fn rename_onto_taken_name_fails() {
        let (store, key) = store_with("Kael");
        let mira = Character::new(
            OwnerId::from("u1"),
            NewCharacter::named("Mira"),
            DEFAULT_BAG_CAPACITY,
        );
        store.upsert_character(&mira).unwrap();
        store.set_active(&key.owner, "Mira").unwrap();

        let err = store.rename_character(&key, "Mira").unwrap_err();
        assert!(matches!(err, StoreError::NameTaken(_)));
        assert!(store.character(&key).unwrap().is_some());
        assert!(store.rename_character(&key, "Kestrel").unwrap());
        assert_eq!(store.active(&key.owner).unwrap().as_deref(), Some("Mira"));
    }

    #[test]
    fn find_by_name_is_case_insensitive_across_owners() {
        let (store, _) = store_with("Kael");
        let other = Character::new(
            OwnerId::from("u2"),
            NewCharacter::named("Mira"),
            DEFAULT_BAG_CAPACITY,
        );
        store.upsert_character(&other).unwrap();
        let found = store.find_character_by_name("mira").unwrap().unwrap();
        assert_eq!(found.owner, OwnerId::from("u2"));
        assert!(store.find_character_by_name("nobody").unwrap().is_none());
    }

    #[test]
    fn characters_are_listed_by_name() {
        let (store, _) = store_with("Zed");
        let c = Character::new(
            OwnerId::from("u1"),
            NewCharacter::named("Ana"),
            DEFAULT_BAG_CAPACITY,
        );
        store.upsert_character(&c).unwrap();
        let names: Vec<String> = store
            .characters(&OwnerId::from("u1"))
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Zed"]);
    }

    #[test]
    fn active_pointer_set_and_clear() {
        let store = MemoryStore::new();
        let owner = OwnerId::from("u1");
        assert!(store.active(&owner).unwrap().is_none());
        store.set_active(&owner, "Kael").unwrap();
        store.set_active(&owner, "Mira").unwrap();
        assert_eq!(store.active(&owner).unwrap().as_deref(), Some("Mira"));
        assert!(store.clear_active(&owner).unwrap());
        assert!(!store.clear_active(&owner).unwrap());
    }
}
