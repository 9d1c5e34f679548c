//! Database snapshot - every collection, saved and loaded as one document

use serde::{Deserialize, Serialize};

use super::account::{normalize_email, Account, Role};
use super::department::Department;
use super::employee::Employee;
use super::request::Request;
use super::result::Result;

pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";
pub const SEED_ADMIN_PASSWORD: &str = "Password123!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Database {
    /// First-run contents: one verified admin and two departments
    pub fn seeded() -> Result<Self> {
        let admin = Account::new(
            "Admin",
            "User",
            SEED_ADMIN_EMAIL,
            SEED_ADMIN_PASSWORD,
            Role::Admin,
            true,
        )?;

        Ok(Self {
            accounts: vec![admin],
            departments: vec![
                Department::new("Engineering", Some("Software team".to_string())),
                Department::new("HR", Some("Human Resources".to_string())),
            ],
            employees: Vec::new(),
            requests: Vec::new(),
        })
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        let email = normalize_email(email);
        self.accounts.iter().find(|a| a.email == email)
    }

    pub fn account_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn department_by_id(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn employee_by_id(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contents() {
        let db = Database::seeded().unwrap();
        assert_eq!(db.accounts.len(), 1);
        assert!(db.accounts[0].is_admin());
        assert!(db.accounts[0].verified);
        assert_eq!(db.departments.len(), 2);
        assert!(db.employees.is_empty());
        assert!(db.requests.is_empty());
    }

    #[test]
    fn test_missing_collections_default() {
        let db: Database = serde_json::from_str(r#"{"accounts":[]}"#).unwrap();
        assert!(db.departments.is_empty());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let db = Database::seeded().unwrap();
        assert!(db.account_by_email(" ADMIN@example.com").is_some());
        assert!(db.account_by_email("nobody@example.com").is_none());
    }
}
