//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Local filesystem (one file per slot) for KeyValueStore
//! - Process memory for KeyValueStore (embedding and tests)

pub mod file_store;
pub mod memory_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
