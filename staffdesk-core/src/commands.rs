//! Typed commands - every form submission the application accepts
//!
//! A command carries everything the operation needs, including the id of
//! the record being edited, so no "currently editing" state lives anywhere.

use serde::{Serialize, Serializer};

use crate::domain::result::StoreError;
use crate::domain::{Access, EmployeeFields, RequestItem, Route};
use crate::services::{AccountUpdate, NewAccount, Registration};

#[derive(Debug, Clone)]
pub enum Command {
    Register(Registration),
    VerifyEmail,
    SignIn { email: String, password: String },
    SignOut,
    UpdateProfile { first_name: String, last_name: String },
    CreateAccount(NewAccount),
    UpdateAccount { id: String, update: AccountUpdate },
    ResetPassword { id: String, password: String },
    DeleteAccount { id: String },
    CreateDepartment { name: String, description: Option<String> },
    UpdateDepartment { id: String, name: String, description: Option<String> },
    DeleteDepartment { id: String },
    CreateEmployee(EmployeeFields),
    UpdateEmployee { id: String, fields: EmployeeFields },
    DeleteEmployee { id: String },
    SubmitRequest { kind: String, items: Vec<RequestItem> },
}

impl Command {
    /// Stable name used in the event log
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register(_) => "register",
            Command::VerifyEmail => "verify_email",
            Command::SignIn { .. } => "sign_in",
            Command::SignOut => "sign_out",
            Command::UpdateProfile { .. } => "update_profile",
            Command::CreateAccount(_) => "create_account",
            Command::UpdateAccount { .. } => "update_account",
            Command::ResetPassword { .. } => "reset_password",
            Command::DeleteAccount { .. } => "delete_account",
            Command::CreateDepartment { .. } => "create_department",
            Command::UpdateDepartment { .. } => "update_department",
            Command::DeleteDepartment { .. } => "delete_department",
            Command::CreateEmployee(_) => "create_employee",
            Command::UpdateEmployee { .. } => "update_employee",
            Command::DeleteEmployee { .. } => "delete_employee",
            Command::SubmitRequest { .. } => "submit_request",
        }
    }

    /// Who may run the command. Mirrors the page each form lives on.
    pub fn access(&self) -> Access {
        match self {
            Command::Register(_) | Command::VerifyEmail | Command::SignIn { .. } | Command::SignOut => {
                Access::Public
            }
            Command::UpdateProfile { .. } | Command::SubmitRequest { .. } => Access::Authenticated,
            _ => Access::AdminOnly,
        }
    }
}

/// Result of a dispatched command
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub message: String,
    /// Page to show next, if the command moves the user somewhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<Route>,
    /// The change was applied but could not be saved
    #[serde(
        serialize_with = "serialize_warning",
        skip_serializing_if = "Option::is_none"
    )]
    pub store_warning: Option<StoreError>,
}

impl Outcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            navigate_to: None,
            store_warning: None,
        }
    }

    pub fn navigate(mut self, route: Route) -> Self {
        self.navigate_to = Some(route);
        self
    }

    pub fn with_persisted(mut self, persisted: Result<(), StoreError>) -> Self {
        if let Err(e) = persisted {
            self.store_warning = Some(e);
        }
        self
    }
}

fn serialize_warning<S: Serializer>(warning: &Option<StoreError>, s: S) -> Result<S::Ok, S::Error> {
    match warning {
        Some(e) => s.serialize_str(&e.to_string()),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_follows_pages() {
        assert_eq!(Command::SignOut.access(), Access::Public);
        assert_eq!(
            Command::SubmitRequest {
                kind: "Equipment".to_string(),
                items: vec![]
            }
            .access(),
            Access::Authenticated
        );
        assert_eq!(
            Command::DeleteDepartment { id: "d".to_string() }.access(),
            Access::AdminOnly
        );
    }

    #[test]
    fn test_outcome_json() {
        let outcome = Outcome::new("Saved")
            .navigate(Route::Profile)
            .with_persisted(Err(StoreError::QuotaExceeded {
                needed: 10,
                limit: 5,
            }));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["navigate_to"], "profile");
        assert!(json["store_warning"].as_str().unwrap().contains("quota"));

        let json = serde_json::to_value(Outcome::new("ok")).unwrap();
        assert!(json.get("store_warning").is_none());
    }
}
