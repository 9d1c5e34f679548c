//! Staffdesk Core - business logic for a small HR record keeper
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, Department, Employee, Request) and routes
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (directory, auth, router, views)
//! - **adapters**: Concrete implementations (file and in-memory storage)

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::{FileKeyValueStore, MemoryKeyValueStore};
use config::Config;
use domain::result::{AuthError, ReferentialError};
use domain::{Access, Account, Principal, Route};
use ports::KeyValueStore;
use services::views::{self, ProfileView};
use services::*;

// Re-export commonly used types at crate root
pub use commands::{Command, Outcome};
pub use domain::result::{Committed, Error, Result, StoreError};
pub use services::{Navigation, Page};

/// Main context for Staffdesk operations
///
/// This is the primary entry point for all business logic. It holds the
/// loaded records, the current session and the event log. Every form
/// submission goes through [`StaffdeskContext::dispatch`] and every page
/// through [`StaffdeskContext::visit`].
pub struct StaffdeskContext {
    pub config: Config,
    pub persistence: Arc<PersistenceService>,
    pub directory: DirectoryService,
    pub auth: AuthService,
    logger: Option<LoggingService>,
}

impl StaffdeskContext {
    /// Open the data directory, seeding it on first use and restoring any
    /// remembered session
    pub fn new(data_dir: &Path, entry_point: EntryPoint) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let store = FileKeyValueStore::new(&data_dir.join("storage"))?.with_quota(config.quota_bytes);
        let logger = if config.event_log {
            Some(LoggingService::new(
                data_dir,
                entry_point,
                env!("CARGO_PKG_VERSION"),
            )?)
        } else {
            None
        };

        Ok(Self::with_store(Arc::new(store), config, logger)?)
    }

    /// Context over an arbitrary store
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        config: Config,
        logger: Option<LoggingService>,
    ) -> Result<Self> {
        let persistence = Arc::new(PersistenceService::new(store, config.storage_key.clone()));
        let directory = DirectoryService::load(Arc::clone(&persistence))?;
        let mut auth = AuthService::new(Arc::clone(&persistence));
        if let Some(account) = auth.restore(&directory) {
            tracing::debug!(account_id = %account.id, "session restored");
        }

        Ok(Self {
            config,
            persistence,
            directory,
            auth,
            logger,
        })
    }

    /// Process-local context with default settings and no event log
    pub fn in_memory() -> Result<Self> {
        Self::with_store(Arc::new(MemoryKeyValueStore::new()), Config::default(), None)
    }

    pub fn logger(&self) -> Option<&LoggingService> {
        self.logger.as_ref()
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.auth.current_account(&self.directory)
    }

    pub fn principal(&self) -> Principal {
        self.auth.principal(&self.directory)
    }

    /// Route a fragment for the current session
    pub fn navigate(&self, fragment: &str) -> Navigation {
        let navigation = Router::navigate(fragment, self.principal());
        self.log(LogEvent::new("page_opened").with_route(navigation.destination().path()));
        navigation
    }

    /// Navigate and build the data for the page that ends up displayed
    pub fn visit(&self, fragment: &str) -> (Navigation, Page) {
        let navigation = self.navigate(fragment);
        let page = self.page(navigation.destination());
        (navigation, page)
    }

    fn page(&self, route: Route) -> Page {
        let current = self.current_account();
        match route {
            Route::Home => Page::Home {
                signed_in_as: current.map(Account::full_name),
            },
            Route::Register => Page::Register,
            Route::VerifyEmail => Page::VerifyEmail {
                pending_email: self.auth.pending_email().ok().flatten(),
            },
            Route::Login => Page::Login,
            Route::Profile => match current {
                Some(account) => Page::Profile(ProfileView::from(account)),
                None => Page::Login,
            },
            Route::Employees => Page::Employees(views::employee_rows(&self.directory)),
            Route::Departments => Page::Departments(views::department_rows(&self.directory)),
            Route::Accounts => Page::Accounts(views::account_rows(&self.directory, current)),
            Route::Requests => match current {
                Some(account) => Page::Requests(views::request_rows(&self.directory, &account.email)),
                None => Page::Login,
            },
        }
    }

    /// Run one command on behalf of the current session
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        let name = command.name();
        let result = self
            .authorize(command.access())
            .and_then(|()| self.execute(command));

        match &result {
            Ok(outcome) => {
                self.log(LogEvent::new("command_executed").with_command(name));
                if let Some(warning) = &outcome.store_warning {
                    self.log(
                        LogEvent::new("save_failed")
                            .with_command(name)
                            .with_error(warning.to_string()),
                    );
                }
            }
            Err(e) => {
                let mut event = LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(error_category(e));
                if let Error::Store(store) = e {
                    event = event.with_error_details(store.to_string());
                }
                self.log(event);
            }
        }
        result
    }

    fn authorize(&self, access: Access) -> Result<()> {
        let principal = self.principal();
        match access {
            Access::Public => Ok(()),
            _ if !principal.is_signed_in() => Err(AuthError::NotSignedIn.into()),
            Access::AdminOnly if !principal.is_admin() => Err(AuthError::AdminOnly.into()),
            _ => Ok(()),
        }
    }

    fn acting_account(&self) -> Result<Account> {
        self.current_account()
            .cloned()
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    fn execute(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::Register(form) => {
                let committed = self.auth.register(&mut self.directory, form)?;
                Outcome::new("Account created! Please verify your email.")
                    .navigate(Route::VerifyEmail)
                    .with_persisted(committed.persisted)
            }
            Command::VerifyEmail => {
                let committed = self.auth.verify_pending(&mut self.directory)?;
                Outcome::new("Email verified! You may now log in.")
                    .navigate(Route::Login)
                    .with_persisted(committed.persisted)
            }
            Command::SignIn { email, password } => {
                let committed = self.auth.sign_in(&mut self.directory, &email, &password)?;
                Outcome::new(format!("Welcome back, {}!", committed.value.first_name))
                    .navigate(Route::Profile)
                    .with_persisted(committed.persisted)
            }
            Command::SignOut => {
                let persisted = self.auth.sign_out();
                Outcome::new("Logged out")
                    .navigate(Route::Home)
                    .with_persisted(persisted)
            }
            Command::UpdateProfile {
                first_name,
                last_name,
            } => {
                let acting = self.acting_account()?;
                let committed = self
                    .directory
                    .update_profile(&acting.id, &first_name, &last_name)?;
                Outcome::new("Profile updated").with_persisted(committed.persisted)
            }
            Command::CreateAccount(new) => {
                let committed = self.directory.create_account(new)?;
                Outcome::new("Account created").with_persisted(committed.persisted)
            }
            Command::UpdateAccount { id, update } => {
                let committed = self.directory.update_account(&id, update)?;
                let mut persisted = committed.persisted;
                if self.auth.session().account_id() == Some(id.as_str()) {
                    persisted = persisted.and(self.auth.refresh_token(&self.directory));
                }
                Outcome::new("Account updated").with_persisted(persisted)
            }
            Command::ResetPassword { id, password } => {
                let committed = self.directory.reset_password(&id, &password)?;
                Outcome::new("Password reset").with_persisted(committed.persisted)
            }
            Command::DeleteAccount { id } => {
                let acting = self.acting_account()?;
                let committed = self.directory.delete_account(&id, Some(&acting.email))?;
                Outcome::new("Account deleted").with_persisted(committed.persisted)
            }
            Command::CreateDepartment { name, description } => {
                let committed = self.directory.create_department(&name, description)?;
                Outcome::new("Department added").with_persisted(committed.persisted)
            }
            Command::UpdateDepartment {
                id,
                name,
                description,
            } => {
                let committed = self.directory.update_department(&id, &name, description)?;
                Outcome::new("Department updated").with_persisted(committed.persisted)
            }
            Command::DeleteDepartment { id } => {
                let committed = self.directory.delete_department(&id)?;
                Outcome::new("Department deleted").with_persisted(committed.persisted)
            }
            Command::CreateEmployee(fields) => {
                let committed = self.directory.create_employee(fields)?;
                Outcome::new("Employee added").with_persisted(committed.persisted)
            }
            Command::UpdateEmployee { id, fields } => {
                let committed = self.directory.update_employee(&id, fields)?;
                Outcome::new("Employee updated").with_persisted(committed.persisted)
            }
            Command::DeleteEmployee { id } => {
                let committed = self.directory.delete_employee(&id)?;
                Outcome::new("Employee deleted").with_persisted(committed.persisted)
            }
            Command::SubmitRequest { kind, items } => {
                let acting = self.acting_account()?;
                let committed = self.directory.create_request(&kind, items, &acting.email)?;
                Outcome::new("Request submitted").with_persisted(committed.persisted)
            }
        };
        Ok(outcome)
    }

    /// Cross-entity references that no longer resolve
    pub fn check_references(&self) -> Vec<ReferentialError> {
        self.directory.check_references()
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log(event) {
                tracing::warn!(error = %e, "failed to write event log");
            }
        }
    }
}

/// Event log category; messages may carry emails so they stay out of the log
fn error_category(error: &Error) -> &'static str {
    match error {
        Error::Validation(_) => "validation",
        Error::Auth(_) => "auth",
        Error::Store(_) => "store",
        Error::Config(_) => "config",
        Error::Credential(_) => "credential",
    }
}
