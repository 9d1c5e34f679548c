//! Password hashing and verification
//!
//! New passwords are stored as Argon2id PHC strings. Values that do not parse
//! as a PHC string are treated as legacy plaintext and compared exactly, so
//! snapshots written before hashing was introduced keep working.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use super::result::{Error, Result};

/// How a stored credential matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMatch {
    /// Matched an Argon2 hash
    Hashed,
    /// Matched a legacy plaintext value; the caller should rehash it
    Legacy,
    NoMatch,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Credential(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored: &str) -> CredentialMatch {
    match PasswordHash::new(stored) {
        Ok(parsed) => {
            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
            {
                CredentialMatch::Hashed
            } else {
                CredentialMatch::NoMatch
            }
        }
        Err(_) if stored == password => CredentialMatch::Legacy,
        Err(_) => CredentialMatch::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password("Password123!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_eq!(verify_password("Password123!", &hash), CredentialMatch::Hashed);
        assert_eq!(verify_password("password123!", &hash), CredentialMatch::NoMatch);
    }

    #[test]
    fn test_legacy_plaintext() {
        assert_eq!(verify_password("secret1", "secret1"), CredentialMatch::Legacy);
        assert_eq!(verify_password("secret2", "secret1"), CredentialMatch::NoMatch);
    }
}
