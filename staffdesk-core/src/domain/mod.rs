//! Core domain entities
//!
//! All records are defined here. These are pure data structures
//! with validation logic - no storage or presentation concerns.

pub mod account;
pub mod credential;
mod database;
mod department;
mod employee;
mod request;
mod route;
mod session;
pub mod result;

pub use account::{Account, Role, MIN_PASSWORD_LENGTH};
pub use database::{Database, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD};
pub use department::{normalize_description, Department};
pub use employee::{Employee, EmployeeFields};
pub use request::{Request, RequestItem, RequestStatus};
pub use route::{Access, Principal, Route};
pub use session::Session;

/// Fresh random id for a new record
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
