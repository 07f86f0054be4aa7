//! Collection persistence
//!
//! Saves and loads the three JSON collections. An absent file reads as
//! the empty collection (or an absent session), so first run needs no
//! initialization step.
//!
//! Storage location: `~/.local/share/stash/` (configurable via `Config`)

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::models::{Item, Session, UserRecord};
use crate::storage::error::{StorageError, StorageResult};

/// Persistence layer for the `users`, `session`, and `items` collections
pub struct CollectionStore {
    config: Config,
}

impl CollectionStore {
    /// Create a store over the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== users ====================

    /// Load all credential records; empty when no one has signed up yet
    pub fn load_users(&self) -> StorageResult<Vec<UserRecord>> {
        Ok(self
            .read_collection(&self.config.users_path())?
            .unwrap_or_default())
    }

    /// Write the full credential collection back
    pub fn save_users(&self, users: &[UserRecord]) -> StorageResult<()> {
        self.write_collection(&self.config.users_path(), &users)
    }

    // ==================== session ====================

    /// Load the persisted session, if any
    pub fn load_session(&self) -> StorageResult<Option<Session>> {
        self.read_collection(&self.config.session_path())
    }

    /// Persist the current session
    pub fn save_session(&self, session: &Session) -> StorageResult<()> {
        self.write_collection(&self.config.session_path(), session)
    }

    /// Remove the persisted session; no error if none exists
    pub fn clear_session(&self) -> StorageResult<()> {
        let path = self.config.session_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Cleared session at {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }

    // ==================== items ====================

    /// Load all item records in insertion order
    pub fn load_items(&self) -> StorageResult<Vec<Item>> {
        Ok(self
            .read_collection(&self.config.items_path())?
            .unwrap_or_default())
    }

    /// Write the full item collection back
    pub fn save_items(&self, items: &[Item]) -> StorageResult<()> {
        self.write_collection(&self.config.items_path(), &items)
    }

    // ==================== maintenance ====================

    /// Delete all stored data
    ///
    /// Removes every collection file. Use with caution!
    pub fn delete_all(&self) -> StorageResult<()> {
        let paths = [
            self.config.users_path(),
            self.config.session_path(),
            self.config.items_path(),
        ];

        for path in paths {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path))?;
            }
        }

        Ok(())
    }

    /// Read a collection file, returning `None` when it does not exist
    fn read_collection<T: DeserializeOwned>(&self, path: &PathBuf) -> StorageResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|e| StorageError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let value = serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidFormat {
            path: path.clone(),
            source: e,
        })?;

        Ok(Some(value))
    }

    /// Serialize and atomically write a collection file
    fn write_collection<T: Serialize>(&self, path: &PathBuf, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialize {
            path: path.clone(),
            source: e,
        })?;

        atomic_write(path, &bytes)?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemKind, User};
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            share_origin: "https://app".to_string(),
        }
    }

    fn sample_user() -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: "ann@x.com".to_string(),
            name: "Ann".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_item(user_id: Uuid) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::new_v4(),
            user_id,
            kind: ItemKind::Note,
            title: "Note".to_string(),
            content: "body".to_string(),
            url: None,
            tags: vec!["a".to_string()],
            is_public: false,
            share_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_store_loads_empty_collections() {
        let temp_dir = TempDir::new().unwrap();
        let store = CollectionStore::new(test_config(&temp_dir));

        assert!(store.load_users().unwrap().is_empty());
        assert!(store.load_session().unwrap().is_none());
        assert!(store.load_items().unwrap().is_empty());
    }

    #[test]
    fn test_users_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = CollectionStore::new(test_config(&temp_dir));

        let users = vec![sample_user()];
        store.save_users(&users).unwrap();

        let loaded = store.load_users().unwrap();
        assert_eq!(loaded, users);
    }

    #[test]
    fn test_session_save_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = CollectionStore::new(test_config(&temp_dir));

        let session = Session {
            user: User {
                id: Uuid::new_v4(),
                email: "ann@x.com".to_string(),
                name: "Ann".to_string(),
                created_at: Utc::now(),
            },
        };

        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());

        // Clearing again is a no-op, not an error
        store.clear_session().unwrap();
    }

    #[test]
    fn test_items_preserve_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = CollectionStore::new(test_config(&temp_dir));

        let user_id = Uuid::new_v4();
        let items: Vec<Item> = (0..5)
            .map(|i| {
                let mut item = sample_item(user_id);
                item.title = format!("Note {}", i);
                item
            })
            .collect();

        store.save_items(&items).unwrap();

        let loaded = store.load_items().unwrap();
        let titles: Vec<&str> = loaded.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Note 0", "Note 1", "Note 2", "Note 3", "Note 4"]);
    }

    #[test]
    fn test_corrupt_collection_reports_invalid_format() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let store = CollectionStore::new(config.clone());

        fs::write(config.items_path(), b"{not json").unwrap();

        let err = store.load_items().unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_delete_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = CollectionStore::new(test_config(&temp_dir));

        store.save_users(&[sample_user()]).unwrap();
        store.save_items(&[sample_item(Uuid::new_v4())]).unwrap();

        store.delete_all().unwrap();
        assert!(store.load_users().unwrap().is_empty());
        assert!(store.load_items().unwrap().is_empty());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.json");

        atomic_write(&nested_path, b"[]").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.json");

        atomic_write(&path, b"[]").unwrap();

        assert!(!path.with_extension("tmp").exists());
    }
}
