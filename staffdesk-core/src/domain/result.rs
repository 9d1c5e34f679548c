//! Result and error types for the core library

use thiserror::Error;

/// Bad user input. State is never changed when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Email does not match any existing account: {0}")]
    UnknownAccount(String),

    #[error("Cannot delete your own account")]
    SelfDeletionForbidden,

    #[error("Must have at least one item")]
    EmptyItemList,

    #[error("Quantity for '{item}' must be at least 1")]
    InvalidQuantity { item: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl ValidationError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Credential, verification and gate failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email, wrong password and unverified account all map here.
    #[error("Invalid credentials or email not verified")]
    InvalidCredentials,

    #[error("No pending verification")]
    NoPendingVerification,

    #[error("Verification failed")]
    VerificationFailed,

    #[error("You must be logged in")]
    NotSignedIn,

    #[error("Access denied: Admin only")]
    AdminOnly,
}

/// A cross-entity reference that no longer resolves.
///
/// Lookups never raise these; they are collected by the integrity check and
/// shown as "N/A" in rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferentialError {
    #[error("Employee {employee_id} references missing department {department_id}")]
    DanglingDepartment {
        employee_id: String,
        department_id: String,
    },

    #[error("Employee {employee_id} references missing account {email}")]
    DanglingAccount { employee_id: String, email: String },

    #[error("Request {request_id} belongs to missing account {email}")]
    OrphanedRequest { request_id: String, email: String },
}

/// Persistence failure. In-memory state stays ahead of storage until the
/// next successful save.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: u64, limit: u64 },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage lock error: {0}")]
    Lock(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing error: {0}")]
    Credential(String),
}

impl Error {
    /// The validation condition, if this is a validation failure
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// The auth condition, if this is an auth failure
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            Self::Auth(e) => Some(e),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// A mutation that was applied in memory, with the outcome of the single
/// snapshot write that followed it.
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub persisted: std::result::Result<(), StoreError>,
}

impl<T> Committed<T> {
    pub fn new(value: T, persisted: std::result::Result<(), StoreError>) -> Self {
        Self { value, persisted }
    }

    /// The store failure to surface, if the write did not land
    pub fn store_warning(&self) -> Option<&StoreError> {
        self.persisted.as_ref().err()
    }

    pub fn into_parts(self) -> (T, std::result::Result<(), StoreError>) {
        (self.value, self.persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::WeakPassword { min: 6 }.to_string(),
            "Password must be at least 6 characters"
        );
        let err: Error = ValidationError::not_found("Department", "d-1").into();
        assert_eq!(err.to_string(), "Department not found: d-1");
        assert!(err.as_validation().is_some());
        assert!(err.as_auth().is_none());
    }

    #[test]
    fn test_committed_warning() {
        let ok = Committed::new(1, Ok(()));
        assert!(ok.store_warning().is_none());

        let failed = Committed::new(2, Err(StoreError::QuotaExceeded { needed: 10, limit: 5 }));
        assert!(failed.store_warning().is_some());
        let (value, persisted) = failed.into_parts();
        assert_eq!(value, 2);
        assert!(persisted.is_err());
    }
}
