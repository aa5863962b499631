use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CharacterStore;
use super::memory::{MemoryStore, Tables};
use crate::character::{Character, CharacterKey, OwnerId};
use crate::error::{StoreError, StoreResult};
use crate::item::{Armor, InventoryItem, Weapon};
use crate::skill::Skill;

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// The on-disk document.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    tables: Tables,
}

/// A store that keeps its tables in memory and rewrites a JSON snapshot
/// after every successful write.
///
/// The snapshot is written to a sibling temp file and renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug)]
pub struct FileStore {
    inner: MemoryStore,
    path: PathBuf,
    flush_lock: Mutex<()>,
}

impl FileStore {
    /// Open the snapshot at `path`, or start empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = match fs::read_to_string(&path) {
            Ok(content) => {
                let snapshot: Snapshot = serde_json::from_str(&content)?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(StoreError::VersionMismatch {
                        expected: SNAPSHOT_VERSION,
                        found: snapshot.version,
                    });
                }
                tracing::debug!(path = %path.display(), saved_at = %snapshot.saved_at, "loaded snapshot");
                snapshot.tables
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no snapshot yet, starting empty");
                Tables::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            inner: MemoryStore::from_tables(tables),
            path,
            flush_lock: Mutex::new(()),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> StoreResult<()> {
        let _guard = self.flush_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            tables: self.inner.tables()?,
        };
        let content = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::trace!(path = %self.path.display(), "snapshot written");
        Ok(())
    }

    fn flush_if(&self, changed: bool) -> StoreResult<bool> {
        if changed {
            self.flush()?;
        }
        Ok(changed)
    }
}

impl CharacterStore for FileStore {
    fn character(&self, key: &CharacterKey) -> StoreResult<Option<Character>> {
        self.inner.character(key)
    }

    fn characters(&self, owner: &OwnerId) -> StoreResult<Vec<Character>> {
        self.inner.characters(owner)
    }

    fn find_character_by_name(&self, name: &str) -> StoreResult<Option<Character>> {
        self.inner.find_character_by_name(name)
    }

    fn upsert_character(&self, character: &Character) -> StoreResult<()> {
        self.inner.upsert_character(character)?;
        self.flush()
    }

    fn delete_character(&self, key: &CharacterKey) -> StoreResult<bool> {
        let removed = self.inner.delete_character(key)?;
        self.flush_if(removed)
    }

    fn rename_character(&self, key: &CharacterKey, new_name: &str) -> StoreResult<bool> {
        let renamed = self.inner.rename_character(key, new_name)?;
        self.flush_if(renamed)
    }

    fn weapon(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Weapon>> {
        self.inner.weapon(key, name)
    }

    fn weapons(&self, key: &CharacterKey) -> StoreResult<Vec<Weapon>> {
        self.inner.weapons(key)
    }

    fn upsert_weapon(&self, key: &CharacterKey, weapon: &Weapon) -> StoreResult<()> {
        self.inner.upsert_weapon(key, weapon)?;
        self.flush()
    }

    fn delete_weapon(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        let removed = self.inner.delete_weapon(key, name)?;
        self.flush_if(removed)
    }

    fn armor(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Armor>> {
        self.inner.armor(key, name)
    }

    fn armors(&self, key: &CharacterKey) -> StoreResult<Vec<Armor>> {
        self.inner.armors(key)
    }

    fn upsert_armor(&self, key: &CharacterKey, armor: &Armor) -> StoreResult<()> {
        self.inner.upsert_armor(key, armor)?;
        self.flush()
    }

    fn delete_armor(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        let removed = self.inner.delete_armor(key, name)?;
        self.flush_if(removed)
    }

    fn skill(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<Skill>> {
        self.inner.skill(key, name)
    }

    fn skills(&self, key: &CharacterKey) -> StoreResult<Vec<Skill>> {
        self.inner.skills(key)
    }

    fn upsert_skill(&self, key: &CharacterKey, skill: &Skill) -> StoreResult<()> {
        self.inner.upsert_skill(key, skill)?;
        self.flush()
    }

    fn delete_skill(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        let removed = self.inner.delete_skill(key, name)?;
        self.flush_if(removed)
    }

    fn item(&self, key: &CharacterKey, name: &str) -> StoreResult<Option<InventoryItem>> {
        self.inner.item(key, name)
    }

    fn inventory(&self, key: &CharacterKey) -> StoreResult<Vec<InventoryItem>> {
        self.inner.inventory(key)
    }

    fn upsert_item(&self, key: &CharacterKey, item: &InventoryItem) -> StoreResult<()> {
        self.inner.upsert_item(key, item)?;
        self.flush()
    }

    fn delete_item(&self, key: &CharacterKey, name: &str) -> StoreResult<bool> {
        let removed = self.inner.delete_item(key, name)?;
        self.flush_if(removed)
    }

    fn active(&self, owner: &OwnerId) -> StoreResult<Option<String>> {
        self.inner.active(owner)
    }

    fn set_active(&self, owner: &OwnerId, name: &str) -> StoreResult<()> {
        self.inner.set_active(owner, name)?;
        self.flush()
    }

    fn clear_active(&self, owner: &OwnerId) -> StoreResult<bool> {
        let removed = self.inner.clear_active(owner)?;
        self.flush_if(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{DEFAULT_BAG_CAPACITY, NewCharacter};
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("fichas.json")).unwrap();
        assert!(store.characters(&OwnerId::from("u1")).unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fichas.json");
        let owner = OwnerId::from("u1");
        {
            let store = FileStore::open(&path).unwrap();
            let c = Character::new(owner.clone(), NewCharacter::named("Kael"), DEFAULT_BAG_CAPACITY);
            store.upsert_character(&c).unwrap();
            store
                .upsert_armor(&c.key(), &Armor::new("Plate", 2, 1).with_bonus(0, 3))
                .unwrap();
            store.set_active(&owner, "Kael").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        let key = CharacterKey::new(owner.clone(), "Kael");
        assert!(store.character(&key).unwrap().is_some());
        assert_eq!(store.armor(&key, "Plate").unwrap().unwrap().speed_bonus, 3);
        assert_eq!(store.active(&owner).unwrap().as_deref(), Some("Kael"));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fichas.json");
        fs::write(
            &path,
            r#"{"version": 99, "saved_at": "2024-01-01T00:00:00Z", "tables": {}}"#,
        )
        .unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionMismatch {
                expected: 1,
                found: 99
            }
        ));
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fichas.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Json(_))));
    }
}
