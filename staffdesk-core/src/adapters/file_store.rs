//! File-backed key-value store
//!
//! Each slot is a file named after its key inside the storage directory.
//! Writes land in a temp file next to the target and are renamed over it,
//! so a slot is always either the old value or the new one. Writers from
//! different processes serialize on an advisory lock (`.lock`).

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::StoreError;
use crate::ports::{validate_key, KeyValueStore};

const LOCK_FILE: &str = ".lock";

pub struct FileKeyValueStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileKeyValueStore {
    /// Open (creating if needed) a storage directory
    pub fn new(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            quota_bytes: None,
        })
    }

    /// Cap the combined size of all slots
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }

    fn lock(&self) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        file.lock_exclusive()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(file)
    }

    /// Bytes used by every slot except `exclude`
    fn used_bytes(&self, exclude: &str) -> Result<u64, StoreError> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name == exclude || validate_key(name).is_err() {
                continue;
            }
            let meta = entry.metadata()?;
            if meta.is_file() {
                total += meta.len();
            }
        }
        Ok(total)
    }

    fn write_locked(&self, key: &str, target: &Path, value: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes(key)? + value.len() as u64;
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(target).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;
        let lock = self.lock()?;
        let result = self.write_locked(key, &path, value);
        let _ = lock.unlock();
        result
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;
        let lock = self.lock()?;
        let result = match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        };
        let _ = lock.unlock();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(&dir.path().join("storage")).unwrap();

        assert_eq!(store.get("auth_token").unwrap(), None);
        store.set("auth_token", "a@x.com").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("a@x.com"));

        store.set("auth_token", "b@x.com").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("b@x.com"));

        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);
        store.remove("auth_token").unwrap();
    }

    #[test]
    fn test_quota_counts_other_slots() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap().with_quota(Some(10));

        store.set("a", "123456").unwrap();
        // Replacing a slot only counts its new size
        store.set("a", "1234567890").unwrap();

        let err = store.set("b", "x").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 11, limit: 10 }));
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1234567890"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap();
        assert!(matches!(store.set("../x", "v"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get(".lock"), Err(StoreError::InvalidKey(_))));
    }
}
