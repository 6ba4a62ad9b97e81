//! Storage backends for the parade venue directory
//!
//! The deduplication engine only sees the [`VenueStore`] and [`TenantStore`]
//! traits; backends are injected at the edges. Two implementations ship
//! here:
//! - [`SqliteStore`]: the production backend
//! - [`MemoryStore`]: an insertion-ordered in-memory backend for tests

pub mod memory_store;
pub mod sqlite_store;
pub mod store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use store::{StoreError, TenantStore, VenueFilter, VenuePatch, VenueStore};
