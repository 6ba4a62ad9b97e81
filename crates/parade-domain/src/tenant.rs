//! Tenant records: the shops and units trading inside a venue.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::venue::VenueId;

/// Unique tenant identifier.
pub type TenantId = Uuid;

/// A tenant unit belonging to a venue.
///
/// `(location_id, name)` is unique within a store; two branches of the same
/// chain in one venue are recorded as a single tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: TenantId,
    pub location_id: VenueId,
    pub name: String,
    pub category: Option<String>,
    pub is_anchor: bool,
}

impl TenantRecord {
    /// Create a tenant under the given venue with a fresh id.
    pub fn new(location_id: VenueId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            location_id,
            name: name.into(),
            category: None,
            is_anchor: false,
        }
    }
}
