//! Directory service - the in-memory record store and its CRUD rules
//!
//! Owns the `Database` snapshot. Every successful mutation is followed by
//! exactly one snapshot write, whose outcome travels back in `Committed`.
//! Failed validation returns before anything is touched.

use std::sync::Arc;

use crate::domain::account::{normalize_email, validate_email, validate_password};
use crate::domain::credential;
use crate::domain::result::{Committed, ReferentialError, Result, ValidationError};
use crate::domain::{
    normalize_description, Account, Database, Department, Employee, EmployeeFields, Request,
    RequestItem, Role,
};

use super::PersistenceService;

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub verified: bool,
}

/// Admin edit of an account. `password: None` keeps the current one.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Role,
    pub verified: bool,
}

pub struct DirectoryService {
    db: Database,
    persistence: Arc<PersistenceService>,
}

impl DirectoryService {
    /// Load the snapshot (seeding it on first run)
    pub fn load(persistence: Arc<PersistenceService>) -> Result<Self> {
        let db = persistence.load()?;
        Ok(Self { db, persistence })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn commit<T>(&self, value: T) -> Committed<T> {
        Committed::new(value, self.persistence.save(&self.db))
    }

    fn account_index(&self, id: &str) -> Result<usize> {
        self.db
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ValidationError::not_found("Account", id).into())
    }

    // === Accounts ===

    pub fn accounts(&self) -> &[Account] {
        &self.db.accounts
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.db.account_by_id(id)
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.db.account_by_email(email)
    }

    pub fn create_account(&mut self, new: NewAccount) -> Result<Committed<Account>> {
        let email = normalize_email(&new.email);
        validate_email(&email)?;
        if self.db.account_by_email(&email).is_some() {
            return Err(ValidationError::DuplicateEmail(email).into());
        }
        validate_password(&new.password)?;
        require(&new.first_name, "firstName")?;
        require(&new.last_name, "lastName")?;

        let account = Account::new(
            new.first_name,
            new.last_name,
            &email,
            &new.password,
            new.role,
            new.verified,
        )?;
        self.db.accounts.push(account.clone());
        tracing::debug!(account_id = %account.id, "account created");
        Ok(self.commit(account))
    }

    pub fn update_account(&mut self, id: &str, update: AccountUpdate) -> Result<Committed<Account>> {
        let index = self.account_index(id)?;

        let email = normalize_email(&update.email);
        validate_email(&email)?;
        if self
            .db
            .accounts
            .iter()
            .any(|a| a.id != id && a.email == email)
        {
            return Err(ValidationError::DuplicateEmail(email).into());
        }
        require(&update.first_name, "firstName")?;
        require(&update.last_name, "lastName")?;
        let password = match update.password.as_deref() {
            Some(p) => {
                validate_password(p)?;
                Some(credential::hash_password(p)?)
            }
            None => None,
        };

        let account = &mut self.db.accounts[index];
        account.first_name = update.first_name.trim().to_string();
        account.last_name = update.last_name.trim().to_string();
        account.email = email;
        if let Some(hash) = password {
            account.password = hash;
        }
        account.role = update.role;
        account.verified = update.verified;

        let account = account.clone();
        Ok(self.commit(account))
    }

    /// Self-service edit of the display name
    pub fn update_profile(
        &mut self,
        id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Committed<Account>> {
        let index = self.account_index(id)?;
        require(first_name, "firstName")?;
        require(last_name, "lastName")?;

        let account = &mut self.db.accounts[index];
        account.first_name = first_name.trim().to_string();
        account.last_name = last_name.trim().to_string();

        let account = account.clone();
        Ok(self.commit(account))
    }

    pub fn reset_password(&mut self, id: &str, new_password: &str) -> Result<Committed<()>> {
        validate_password(new_password)?;
        let index = self.account_index(id)?;
        let hash = credential::hash_password(new_password)?;
        self.db.accounts[index].password = hash;
        Ok(self.commit(()))
    }

    /// Store a fresh hash for a password that was just proven correct.
    ///
    /// Used to upgrade legacy plaintext credentials; no length check.
    pub(crate) fn rehash_password(&mut self, id: &str, password: &str) -> Result<Committed<()>> {
        let index = self.account_index(id)?;
        let hash = credential::hash_password(password)?;
        self.db.accounts[index].password = hash;
        Ok(self.commit(()))
    }

    /// Mark the account with this email verified
    pub fn verify_account(&mut self, email: &str) -> Result<Committed<Account>> {
        let email = normalize_email(email);
        let account = self
            .db
            .accounts
            .iter_mut()
            .find(|a| a.email == email)
            .ok_or_else(|| ValidationError::not_found("Account", email.clone()))?;
        account.verified = true;

        let account = account.clone();
        Ok(self.commit(account))
    }

    /// Delete an account. `acting_email` is the signed-in user's email;
    /// an account can never delete itself.
    pub fn delete_account(&mut self, id: &str, acting_email: Option<&str>) -> Result<Committed<Account>> {
        let index = self.account_index(id)?;
        if let Some(acting) = acting_email {
            if self.db.accounts[index].email == normalize_email(acting) {
                return Err(ValidationError::SelfDeletionForbidden.into());
            }
        }

        let removed = self.db.accounts.remove(index);
        tracing::debug!(account_id = %removed.id, "account deleted");
        Ok(self.commit(removed))
    }

    // === Departments ===

    pub fn departments(&self) -> &[Department] {
        &self.db.departments
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.db.department_by_id(id)
    }

    pub fn create_department(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<Committed<Department>> {
        require(name, "name")?;
        let department = Department::new(name, description);
        self.db.departments.push(department.clone());
        Ok(self.commit(department))
    }

    pub fn update_department(
        &mut self,
        id: &str,
        name: &str,
        description: Option<String>,
    ) -> Result<Committed<Department>> {
        require(name, "name")?;
        let department = self
            .db
            .departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ValidationError::not_found("Department", id))?;
        department.name = name.trim().to_string();
        department.description = normalize_description(description);

        let department = department.clone();
        Ok(self.commit(department))
    }

    /// Employees pointing at the department are left as they are
    pub fn delete_department(&mut self, id: &str) -> Result<Committed<Department>> {
        let index = self
            .db
            .departments
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| ValidationError::not_found("Department", id))?;
        let removed = self.db.departments.remove(index);
        Ok(self.commit(removed))
    }

    // === Employees ===

    pub fn employees(&self) -> &[Employee] {
        &self.db.employees
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.db.employee_by_id(id)
    }

    /// The account behind an employee, `None` if it has gone away
    pub fn employee_account(&self, employee: &Employee) -> Option<&Account> {
        self.db.account_by_email(&employee.email)
    }

    /// The employee's department, `None` if it has gone away
    pub fn employee_department(&self, employee: &Employee) -> Option<&Department> {
        self.db.department_by_id(&employee.department_id)
    }

    fn validate_employee(&self, fields: &EmployeeFields) -> Result<()> {
        let email = normalize_email(&fields.email);
        if self.db.account_by_email(&email).is_none() {
            return Err(ValidationError::UnknownAccount(email).into());
        }
        require(&fields.employee_id, "employeeId")?;
        Ok(())
    }

    pub fn create_employee(&mut self, fields: EmployeeFields) -> Result<Committed<Employee>> {
        self.validate_employee(&fields)?;
        let employee = Employee::new(fields);
        self.db.employees.push(employee.clone());
        Ok(self.commit(employee))
    }

    pub fn update_employee(&mut self, id: &str, fields: EmployeeFields) -> Result<Committed<Employee>> {
        let index = self
            .db
            .employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::not_found("Employee", id))?;
        self.validate_employee(&fields)?;

        let employee = &mut self.db.employees[index];
        employee.apply(fields);

        let employee = employee.clone();
        Ok(self.commit(employee))
    }

    pub fn delete_employee(&mut self, id: &str) -> Result<Committed<Employee>> {
        let index = self
            .db
            .employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::not_found("Employee", id))?;
        let removed = self.db.employees.remove(index);
        Ok(self.commit(removed))
    }

    // === Requests ===

    pub fn create_request(
        &mut self,
        kind: &str,
        items: Vec<RequestItem>,
        owner_email: &str,
    ) -> Result<Committed<Request>> {
        let request = Request::new(kind, items, owner_email)?;
        self.db.requests.push(request.clone());
        Ok(self.commit(request))
    }

    /// Requests owned by `email`, in creation order
    pub fn requests_for<'a>(&'a self, email: &'a str) -> impl Iterator<Item = &'a Request> + 'a {
        self.db
            .requests
            .iter()
            .filter(move |r| r.employee_email == email)
    }

    // === Integrity ===

    /// Every cross-entity reference that no longer resolves
    pub fn check_references(&self) -> Vec<ReferentialError> {
        let mut problems = Vec::new();

        for employee in &self.db.employees {
            if self.employee_department(employee).is_none() {
                problems.push(ReferentialError::DanglingDepartment {
                    employee_id: employee.employee_id.clone(),
                    department_id: employee.department_id.clone(),
                });
            }
            if self.employee_account(employee).is_none() {
                problems.push(ReferentialError::DanglingAccount {
                    employee_id: employee.employee_id.clone(),
                    email: employee.email.clone(),
                });
            }
        }

        for request in &self.db.requests {
            if self.db.account_by_email(&request.employee_email).is_none() {
                problems.push(ReferentialError::OrphanedRequest {
                    request_id: request.id.clone(),
                    email: request.employee_email.clone(),
                });
            }
        }

        problems
    }
}

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}
