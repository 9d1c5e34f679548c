//! In-memory key-value store, for embedding and tests

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::result::StoreError;
use crate::ports::{validate_key, KeyValueStore};

#[derive(Default)]
pub struct MemoryKeyValueStore {
    slots: RwLock<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the combined size of all slots
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    fn poisoned(e: impl std::fmt::Display) -> StoreError {
        StoreError::Lock(format!("Lock poisoned: {}", e))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let slots = self.slots.read().map_err(Self::poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut slots = self.slots.write().map_err(Self::poisoned)?;

        if let Some(limit) = self.quota_bytes {
            let others: u64 = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = others + value.len() as u64;
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut slots = self.slots.write().map_err(Self::poisoned)?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota() {
        let store = MemoryKeyValueStore::new().with_quota(Some(4));
        store.set("k", "1234").unwrap();
        assert!(matches!(
            store.set("j", "1"),
            Err(StoreError::QuotaExceeded { needed: 5, limit: 4 })
        ));
        store.remove("k").unwrap();
        store.set("j", "1").unwrap();
    }
}
