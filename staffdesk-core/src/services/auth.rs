//! Auth service - registration, verification and the signed-in session
//!
//! The session itself is never persisted. Only the restoration token (the
//! signed-in email) is, so a later process can `restore` without asking for
//! the password again.

use std::sync::Arc;

use crate::domain::credential::{self, CredentialMatch};
use crate::domain::result::{AuthError, Committed, Error, Result, StoreError, ValidationError};
use crate::domain::{Account, Principal, Role, Session};

use super::directory::{DirectoryService, NewAccount};
use super::PersistenceService;

/// Self-registration form
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    session: Session,
    persistence: Arc<PersistenceService>,
}

impl AuthService {
    pub fn new(persistence: Arc<PersistenceService>) -> Self {
        Self {
            session: Session::anonymous(),
            persistence,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in account, looked up fresh
    pub fn current_account<'a>(&self, directory: &'a DirectoryService) -> Option<&'a Account> {
        self.session
            .account_id()
            .and_then(|id| directory.account(id))
    }

    pub fn principal(&self, directory: &DirectoryService) -> Principal {
        match self.current_account(directory) {
            None => Principal::Anonymous,
            Some(a) if a.role == Role::Admin => Principal::Admin,
            Some(_) => Principal::User,
        }
    }

    /// Create an unverified user account and remember it as the pending
    /// verification.
    pub fn register(
        &mut self,
        directory: &mut DirectoryService,
        form: Registration,
    ) -> Result<Committed<Account>> {
        let committed = directory.create_account(NewAccount {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            password: form.password,
            role: Role::User,
            verified: false,
        })?;

        let (account, persisted) = committed.into_parts();
        let persisted = persisted.and(self.persistence.set_pending_verification(&account.email));
        tracing::info!(account_id = %account.id, "account registered, awaiting verification");
        Ok(Committed::new(account, persisted))
    }

    /// Verify the account recorded by the last registration
    pub fn verify_pending(&mut self, directory: &mut DirectoryService) -> Result<Committed<Account>> {
        let email = self
            .persistence
            .pending_verification()?
            .ok_or(AuthError::NoPendingVerification)?;

        let committed = match directory.verify_account(&email) {
            Ok(c) => c,
            Err(Error::Validation(ValidationError::NotFound { .. })) => {
                return Err(AuthError::VerificationFailed.into())
            }
            Err(e) => return Err(e),
        };

        let (account, persisted) = committed.into_parts();
        let persisted = persisted.and(self.persistence.clear_pending_verification());
        Ok(Committed::new(account, persisted))
    }

    /// The email waiting for verification, if any
    pub fn pending_email(&self) -> std::result::Result<Option<String>, StoreError> {
        self.persistence.pending_verification()
    }

    /// Sign in with email and password.
    ///
    /// Unknown email, wrong password and unverified account all fail with
    /// `InvalidCredentials`. A legacy plaintext password is rehashed on
    /// success. The session is established even when the rehash or the
    /// token write does not reach the store; that failure comes back in
    /// `persisted`.
    pub fn sign_in(
        &mut self,
        directory: &mut DirectoryService,
        email: &str,
        password: &str,
    ) -> std::result::Result<Committed<Account>, AuthError> {
        let account = directory
            .account_by_email(email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let matched = credential::verify_password(password, &account.password);
        if matched == CredentialMatch::NoMatch || !account.verified {
            tracing::debug!("sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let mut persisted = Ok(());
        if matched == CredentialMatch::Legacy {
            match directory.rehash_password(&account.id, password) {
                Ok(committed) => persisted = committed.persisted,
                Err(e) => tracing::warn!(error = %e, "failed to rehash legacy credential"),
            }
        }

        self.session = Session::signed_in(&account);
        let persisted = persisted.and(self.persistence.set_session_token(&account.email));
        if let Err(e) = &persisted {
            tracing::warn!(error = %e, "sign-in not fully persisted");
        }
        tracing::info!(account_id = %account.id, "signed in");

        // Re-read so a rehash is reflected
        let account = directory.account(&account.id).cloned().unwrap_or(account);
        Ok(Committed::new(account, persisted))
    }

    /// Clear the session and forget the restoration token
    pub fn sign_out(&mut self) -> std::result::Result<(), StoreError> {
        self.session = Session::anonymous();
        self.persistence.clear_session_token()
    }

    /// Re-establish the session from the persisted token.
    ///
    /// A token that does not resolve to a verified account is discarded.
    pub fn restore(&mut self, directory: &DirectoryService) -> Option<Account> {
        let token = match self.persistence.session_token() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session token");
                return None;
            }
        };

        match directory.account_by_email(&token) {
            Some(account) if account.verified => {
                self.session = Session::signed_in(account);
                Some(account.clone())
            }
            _ => {
                tracing::info!("discarding stale session token");
                if let Err(e) = self.persistence.clear_session_token() {
                    tracing::warn!(error = %e, "failed to clear session token");
                }
                None
            }
        }
    }

    /// Keep the token in step after the signed-in account's email changed
    pub fn refresh_token(&self, directory: &DirectoryService) -> std::result::Result<(), StoreError> {
        match self.current_account(directory) {
            Some(account) => self.persistence.set_session_token(&account.email),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use crate::domain::{SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD};
    use crate::ports::KeyValueStore;
    use crate::services::persistence::DEFAULT_SNAPSHOT_KEY;

    fn setup() -> (AuthService, DirectoryService, Arc<PersistenceService>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let persistence = Arc::new(PersistenceService::new(store, DEFAULT_SNAPSHOT_KEY));
        let directory = DirectoryService::load(Arc::clone(&persistence)).unwrap();
        (AuthService::new(Arc::clone(&persistence)), directory, persistence)
    }

    fn registration() -> Registration {
        Registration {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_unverified_cannot_sign_in() {
        let (mut auth, mut dir, _) = setup();
        let account = auth.register(&mut dir, registration()).unwrap().value;
        assert!(!account.verified);

        assert_eq!(
            auth.sign_in(&mut dir, "a@x.com", "secret1").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert!(!auth.session().is_signed_in());

        auth.verify_pending(&mut dir).unwrap();
        let signed_in = auth.sign_in(&mut dir, "A@X.com", "secret1").unwrap().value;
        assert_eq!(signed_in.id, account.id);
        assert_eq!(auth.principal(&dir), Principal::User);
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let (mut auth, mut dir, _) = setup();
        assert_eq!(
            auth.sign_in(&mut dir, "nobody@x.com", "whatever").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.sign_in(&mut dir, SEED_ADMIN_EMAIL, "wrong-password").unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_verify_without_pending() {
        let (mut auth, mut dir, _) = setup();
        let err = auth.verify_pending(&mut dir).unwrap_err();
        assert_eq!(err.as_auth(), Some(&AuthError::NoPendingVerification));
    }

    #[test]
    fn test_sign_out_clears_token() {
        let (mut auth, mut dir, persistence) = setup();
        let committed = auth
            .sign_in(&mut dir, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD)
            .unwrap();
        assert!(committed.store_warning().is_none());
        assert_eq!(
            persistence.session_token().unwrap().as_deref(),
            Some(SEED_ADMIN_EMAIL)
        );
        assert_eq!(auth.principal(&dir), Principal::Admin);

        auth.sign_out().unwrap();
        assert_eq!(persistence.session_token().unwrap(), None);
        assert_eq!(auth.principal(&dir), Principal::Anonymous);
    }

    #[test]
    fn test_restore() {
        let (mut auth, dir, persistence) = setup();
        persistence.set_session_token(SEED_ADMIN_EMAIL).unwrap();
        let restored = auth.restore(&dir).unwrap();
        assert_eq!(restored.email, SEED_ADMIN_EMAIL);
        assert!(auth.session().is_signed_in());
    }

    #[test]
    fn test_restore_discards_unverified_token() {
        let (mut auth, mut dir, persistence) = setup();
        auth.register(&mut dir, registration()).unwrap();
        persistence.set_session_token("a@x.com").unwrap();

        assert!(auth.restore(&dir).is_none());
        assert_eq!(persistence.session_token().unwrap(), None);
    }

    #[test]
    fn test_legacy_plaintext_is_upgraded() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let persistence = Arc::new(PersistenceService::new(store, DEFAULT_SNAPSHOT_KEY));

        // Snapshot written before credentials were hashed
        let mut db = crate::domain::Database::seeded().unwrap();
        let mut legacy = db.accounts[0].clone();
        legacy.id = "legacy-1".to_string();
        legacy.email = "old@x.com".to_string();
        legacy.password = "plain-pass".to_string();
        legacy.role = Role::User;
        db.accounts.push(legacy);
        persistence.save(&db).unwrap();

        let mut dir = DirectoryService::load(Arc::clone(&persistence)).unwrap();
        let mut auth = AuthService::new(Arc::clone(&persistence));

        let committed = auth.sign_in(&mut dir, "old@x.com", "plain-pass").unwrap();
        assert!(committed.store_warning().is_none());
        let signed_in = committed.value;
        assert!(signed_in.password.starts_with("$argon2"));

        // The upgrade was persisted and the same password still works
        let mut reloaded = DirectoryService::load(Arc::clone(&persistence)).unwrap();
        let mut fresh = AuthService::new(persistence);
        assert!(fresh.sign_in(&mut reloaded, "old@x.com", "plain-pass").is_ok());
    }
}
