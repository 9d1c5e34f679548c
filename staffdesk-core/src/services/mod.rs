//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod directory;
pub mod logging;
pub mod persistence;
mod router;
pub mod views;

pub use auth::{AuthService, Registration};
pub use directory::{AccountUpdate, DirectoryService, NewAccount};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use persistence::PersistenceService;
pub use router::{Navigation, Router, ADMIN_ONLY_WARNING};
pub use views::Page;
