//! Session domain model

use super::account::Account;

/// The signed-in identity, if any.
///
/// Holds the account id rather than a copy of the account so edits made
/// while signed in (role, name, email) are seen on the next lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    account_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(account: &Account) -> Self {
        Self {
            account_id: Some(account.id.clone()),
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.account_id.is_some()
    }
}
