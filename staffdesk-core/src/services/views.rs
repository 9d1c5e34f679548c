//! Page read models
//!
//! Rows computed from the directory for each page. Dangling references are
//! shown as "N/A" (department) or the raw email (employee name) instead of
//! failing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Account, RequestStatus, Role};

use super::directory::DirectoryService;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&Account> for ProfileView {
    fn from(account: &Account) -> Self {
        Self {
            name: account.full_name(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeRow {
    pub id: String,
    pub employee_id: String,
    /// Account name, or the employee email when the account is gone
    pub name: String,
    pub email: String,
    pub position: String,
    /// Department name, or "N/A" when the department is gone
    pub department: String,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentRow {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    /// The signed-in account; its delete action is disabled
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestRow {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub items: String,
    pub status: RequestStatus,
}

pub fn employee_rows(directory: &DirectoryService) -> Vec<EmployeeRow> {
    directory
        .employees()
        .iter()
        .map(|emp| EmployeeRow {
            id: emp.id.clone(),
            employee_id: emp.employee_id.clone(),
            name: directory
                .employee_account(emp)
                .map(Account::full_name)
                .unwrap_or_else(|| emp.email.clone()),
            email: emp.email.clone(),
            position: emp.position.clone(),
            department: directory
                .employee_department(emp)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            hire_date: emp.hire_date,
        })
        .collect()
}

pub fn department_rows(directory: &DirectoryService) -> Vec<DepartmentRow> {
    directory
        .departments()
        .iter()
        .map(|d| DepartmentRow {
            id: d.id.clone(),
            name: d.name.clone(),
            description: d.description.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn account_rows(directory: &DirectoryService, current: Option<&Account>) -> Vec<AccountRow> {
    directory
        .accounts()
        .iter()
        .map(|a| AccountRow {
            id: a.id.clone(),
            name: a.full_name(),
            email: a.email.clone(),
            role: a.role,
            verified: a.verified,
            is_self: current.is_some_and(|c| c.email == a.email),
        })
        .collect()
}

/// Only the given owner's requests
pub fn request_rows(directory: &DirectoryService, owner_email: &str) -> Vec<RequestRow> {
    directory
        .requests_for(owner_email)
        .map(|r| RequestRow {
            id: r.id.clone(),
            date: r.date,
            kind: r.kind.clone(),
            items: r.items_summary(),
            status: r.status,
        })
        .collect()
}

/// Everything a page needs to be drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "data", rename_all = "kebab-case")]
pub enum Page {
    Home { signed_in_as: Option<String> },
    Register,
    VerifyEmail { pending_email: Option<String> },
    Login,
    Profile(ProfileView),
    Employees(Vec<EmployeeRow>),
    Departments(Vec<DepartmentRow>),
    Accounts(Vec<AccountRow>),
    Requests(Vec<RequestRow>),
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use crate::domain::{EmployeeFields, RequestItem};
    use crate::ports::KeyValueStore;
    use crate::services::persistence::DEFAULT_SNAPSHOT_KEY;
    use crate::services::PersistenceService;

    fn directory() -> DirectoryService {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let persistence = Arc::new(PersistenceService::new(store, DEFAULT_SNAPSHOT_KEY));
        DirectoryService::load(persistence).unwrap()
    }

    #[test]
    fn test_dangling_department_shows_na() {
        let mut dir = directory();
        let dept = dir.departments()[1].id.clone();
        dir.create_employee(EmployeeFields {
            employee_id: "EMP-7".to_string(),
            email: "admin@example.com".to_string(),
            position: "Recruiter".to_string(),
            department_id: dept.clone(),
            hire_date: None,
        })
        .unwrap();

        assert_eq!(employee_rows(&dir)[0].department, "HR");
        assert_eq!(employee_rows(&dir)[0].name, "Admin User");

        dir.delete_department(&dept).unwrap();
        assert_eq!(employee_rows(&dir)[0].department, NOT_AVAILABLE);
    }

    #[test]
    fn test_account_rows_flag_self() {
        let dir = directory();
        let admin = dir.accounts()[0].clone();
        let rows = account_rows(&dir, Some(&admin));
        assert!(rows[0].is_self);
        assert!(!account_rows(&dir, None)[0].is_self);
    }

    #[test]
    fn test_request_rows_only_owner() {
        let mut dir = directory();
        dir.create_request("Equipment", vec![RequestItem::new("Laptop", 1)], "a@x.com")
            .unwrap();
        dir.create_request("Equipment", vec![RequestItem::new("Monitor", 2)], "b@x.com")
            .unwrap();

        let rows = request_rows(&dir, "b@x.com");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items, "Monitor (2)");
        assert_eq!(rows[0].status, RequestStatus::Pending);
    }
}
