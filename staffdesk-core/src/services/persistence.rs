//! Persistence service - snapshot load/save and the small session slots

use std::sync::Arc;

use crate::domain::result::{Result, StoreError};
use crate::domain::Database;
use crate::ports::KeyValueStore;

/// Slot holding the session restoration token (the signed-in email)
pub const SESSION_TOKEN_KEY: &str = "auth_token";
/// Slot holding the email waiting for verification
pub const PENDING_VERIFICATION_KEY: &str = "unverified_email";
/// Default snapshot slot
pub const DEFAULT_SNAPSHOT_KEY: &str = "ipt_demo_v1";

/// Reads and writes the database snapshot as one JSON document.
///
/// Writes replace the whole snapshot; the last write wins.
pub struct PersistenceService {
    store: Arc<dyn KeyValueStore>,
    snapshot_key: String,
}

impl PersistenceService {
    pub fn new(store: Arc<dyn KeyValueStore>, snapshot_key: impl Into<String>) -> Self {
        Self {
            store,
            snapshot_key: snapshot_key.into(),
        }
    }

    pub fn snapshot_key(&self) -> &str {
        &self.snapshot_key
    }

    /// Load the stored snapshot, seeding a fresh one when the slot is
    /// missing, is not JSON, or is not a JSON object. Storage failures are
    /// returned as errors so a read problem never overwrites existing data.
    /// So is a well-formed snapshot with a record that does not decode.
    ///
    /// A failed write of the seed is logged; the seed is returned anyway.
    pub fn load(&self) -> Result<Database> {
        let Some(raw) = self.store.get(&self.snapshot_key)? else {
            tracing::info!(key = %self.snapshot_key, "no snapshot found, seeding");
            return self.seed();
        };

        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) if value.is_object() => value,
            Ok(_) => {
                tracing::warn!(key = %self.snapshot_key, "snapshot is not an object, reseeding");
                return self.seed();
            }
            Err(e) => {
                tracing::warn!(key = %self.snapshot_key, error = %e, "snapshot malformed, reseeding");
                return self.seed();
            }
        };

        serde_json::from_value(value).map_err(|e| {
            tracing::error!(key = %self.snapshot_key, error = %e, "snapshot has an unreadable record");
            StoreError::Serialize(e).into()
        })
    }

    fn seed(&self) -> Result<Database> {
        let db = Database::seeded()?;
        if let Err(e) = self.save(&db) {
            tracing::warn!(error = %e, "failed to persist seeded snapshot");
        }
        Ok(db)
    }

    /// Serialize and write the whole snapshot
    pub fn save(&self, db: &Database) -> std::result::Result<(), StoreError> {
        let raw = serde_json::to_string(db)?;
        self.store.set(&self.snapshot_key, &raw).map_err(|e| {
            tracing::error!(key = %self.snapshot_key, error = %e, "failed to save snapshot");
            e
        })
    }

    // === Session token ===

    pub fn session_token(&self) -> std::result::Result<Option<String>, StoreError> {
        self.store.get(SESSION_TOKEN_KEY)
    }

    pub fn set_session_token(&self, email: &str) -> std::result::Result<(), StoreError> {
        self.store.set(SESSION_TOKEN_KEY, email)
    }

    pub fn clear_session_token(&self) -> std::result::Result<(), StoreError> {
        self.store.remove(SESSION_TOKEN_KEY)
    }

    // === Pending verification ===

    pub fn pending_verification(&self) -> std::result::Result<Option<String>, StoreError> {
        self.store.get(PENDING_VERIFICATION_KEY)
    }

    pub fn set_pending_verification(&self, email: &str) -> std::result::Result<(), StoreError> {
        self.store.set(PENDING_VERIFICATION_KEY, email)
    }

    pub fn clear_pending_verification(&self) -> std::result::Result<(), StoreError> {
        self.store.remove(PENDING_VERIFICATION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use crate::domain::result::Error;

    fn service(store: Arc<MemoryKeyValueStore>) -> PersistenceService {
        PersistenceService::new(store, DEFAULT_SNAPSHOT_KEY)
    }

    #[test]
    fn test_first_load_seeds_and_persists() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let persistence = service(Arc::clone(&store));

        let db = persistence.load().unwrap();
        assert_eq!(db.accounts.len(), 1);
        assert!(store.get(DEFAULT_SNAPSHOT_KEY).unwrap().is_some());

        // Second load reads back the same seed instead of reseeding
        let again = persistence.load().unwrap();
        assert_eq!(again, db);
    }

    #[test]
    fn test_malformed_snapshot_reseeds() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(DEFAULT_SNAPSHOT_KEY, "{not json").unwrap();
        let persistence = service(Arc::clone(&store));

        let db = persistence.load().unwrap();
        assert_eq!(db.departments.len(), 2);

        let raw = store.get(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<Database>(&raw).is_ok());
    }

    #[test]
    fn test_non_object_snapshot_reseeds() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(DEFAULT_SNAPSHOT_KEY, "\"hello\"").unwrap();
        let db = service(store).load().unwrap();
        assert_eq!(db.accounts.len(), 1);
    }

    #[test]
    fn test_unreadable_record_is_not_overwritten() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let persistence = service(Arc::clone(&store));
        persistence.load().unwrap();

        let mut snapshot: serde_json::Value =
            serde_json::from_str(&store.get(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap()).unwrap();
        snapshot["employees"] = serde_json::json!([{
            "id": "e1",
            "employeeId": "EMP-001",
            "email": "admin@example.com",
            "position": "Engineer",
            "departmentId": "d1",
            "hireDate": "03/01/2024"
        }]);
        let raw = snapshot.to_string();
        store.set(DEFAULT_SNAPSHOT_KEY, &raw).unwrap();

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Serialize(_))));
        assert_eq!(store.get(DEFAULT_SNAPSHOT_KEY).unwrap().as_deref(), Some(raw.as_str()));
    }

    #[test]
    fn test_seed_returned_when_write_fails() {
        let store = Arc::new(MemoryKeyValueStore::new().with_quota(Some(8)));
        let persistence = service(store);

        let db = persistence.load().unwrap();
        assert_eq!(db.accounts.len(), 1);
        assert!(matches!(
            persistence.save(&db),
            Err(StoreError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn test_slots() {
        let persistence = service(Arc::new(MemoryKeyValueStore::new()));
        assert_eq!(persistence.session_token().unwrap(), None);
        persistence.set_session_token("a@x.com").unwrap();
        assert_eq!(persistence.session_token().unwrap().as_deref(), Some("a@x.com"));
        persistence.clear_session_token().unwrap();
        assert_eq!(persistence.session_token().unwrap(), None);

        persistence.set_pending_verification("b@x.com").unwrap();
        assert_eq!(
            persistence.pending_verification().unwrap().as_deref(),
            Some("b@x.com")
        );
        persistence.clear_pending_verification().unwrap();
        assert_eq!(persistence.pending_verification().unwrap(), None);
    }
}
