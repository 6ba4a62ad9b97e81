//! Domain types for the parade retail venue directory
//!
//! This crate provides the canonical models shared by the stores and the
//! deduplication engine:
//! - VenueRecord: a shopping centre, retail park, or outlet village
//! - TenantRecord: a shop or unit trading inside a venue
//! - VenueField / FieldValue: the field-level vocabulary used by merges
//!   and partial updates

pub mod field;
pub mod tenant;
pub mod venue;

pub use field::*;
pub use tenant::*;
pub use venue::*;
