//! Account domain model

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::credential;
use super::new_id;
use super::result::ValidationError;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Account role. Stored as the strings "Admin" and "User".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("Unknown role: {}. Available: Admin, User", other)),
        }
    }
}

/// A sign-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Trimmed and lowercased; unique across accounts
    pub email: String,
    /// Argon2 PHC string. Snapshots from older installs may hold plaintext.
    pub password: String,
    pub role: Role,
    pub verified: bool,
}

impl Account {
    /// Build an account, hashing the password.
    ///
    /// The email is normalized; callers are expected to have validated it.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: &str,
        password: &str,
        role: Role,
        verified: bool,
    ) -> crate::domain::result::Result<Self> {
        Ok(Self {
            id: new_id(),
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            email: normalize_email(email),
            password: credential::hash_password(password)?,
            role,
            verified,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Trim and lowercase an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email pattern is valid"))
}

/// Check an already-normalized email has a `local@domain` shape
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Length check applied to new and reset passwords
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  A@X.com "), "a@x.com");
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(
            validate_email("not-an-email"),
            Err(ValidationError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(validate_email(""), Err(ValidationError::MissingField("email")));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(ValidationError::WeakPassword { min: 6 })
        );
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Admin\"");
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let account = Account::new("Ada", "Lovelace", "Ada@Example.com", "secret1", Role::User, false)
            .unwrap();
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["verified"], false);
        assert_ne!(json["password"], "secret1");
    }
}
