//! Key-value storage port - the local storage every record lives in

use crate::domain::result::StoreError;

/// String-keyed, string-valued slot storage.
///
/// Each `set` replaces the whole value for its key. Implementations enforce
/// their own size limits and report them as `StoreError::QuotaExceeded`.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. A missing slot is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace a slot's value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Keys are used as file names by the file adapter, so the alphabet is
/// restricted everywhere to keep adapters interchangeable.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
