use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parade_domain::{FieldValue, TenantId, TenantRecord, VenueField, VenueId, VenueRecord};

/// Row filter for venue queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueFilter {
    /// Only return venues with a non-blank website.
    pub website_only: bool,
}

impl VenueFilter {
    /// Every venue.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only venues that carry a website.
    pub fn with_website() -> Self {
        Self { website_only: true }
    }

    /// Whether a record passes the filter. Backends without a query engine
    /// evaluate this directly.
    pub fn matches(&self, venue: &VenueRecord) -> bool {
        if self.website_only {
            venue
                .website
                .as_deref()
                .map(|w| !w.trim().is_empty())
                .unwrap_or(false)
        } else {
            true
        }
    }
}

/// An ordered set of field assignments applied in one update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenuePatch {
    fields: Vec<(VenueField, FieldValue)>,
}

impl VenuePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an assignment. Later assignments to the same field win.
    pub fn set(&mut self, field: VenueField, value: FieldValue) {
        self.fields.push((field, value));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(VenueField, FieldValue)> {
        self.fields.iter()
    }
}

/// The trait venue storage backends implement.
pub trait VenueStore: Send + Sync {
    /// Insert a new venue.
    fn insert(&self, venue: &VenueRecord) -> Result<(), StoreError>;

    /// Fetch venues matching the filter, in stable insertion order.
    fn find_all(&self, filter: &VenueFilter) -> Result<Vec<VenueRecord>, StoreError>;

    /// Get a venue by id.
    fn get(&self, id: VenueId) -> Result<Option<VenueRecord>, StoreError>;

    /// Apply a field patch to an existing venue.
    fn update(&self, id: VenueId, patch: &VenuePatch) -> Result<(), StoreError>;

    /// Delete a venue by id.
    fn delete(&self, id: VenueId) -> Result<(), StoreError>;
}

/// The trait tenant storage backends implement.
pub trait TenantStore: Send + Sync {
    /// Insert a new tenant under its venue.
    fn insert(&self, tenant: &TenantRecord) -> Result<(), StoreError>;

    /// All tenants of a venue, in stable insertion order.
    fn find_by_parent(&self, location_id: VenueId) -> Result<Vec<TenantRecord>, StoreError>;

    /// Look up a tenant by exact name under a venue.
    fn find_by_parent_and_name(
        &self,
        location_id: VenueId,
        name: &str,
    ) -> Result<Option<TenantRecord>, StoreError>;

    /// Move a tenant to a different venue.
    fn update_parent(&self, tenant_id: TenantId, new_location_id: VenueId)
        -> Result<(), StoreError>;

    /// Delete a tenant by id.
    fn delete(&self, tenant_id: TenantId) -> Result<(), StoreError>;
}

/// Errors from the venue and tenant stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Record already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
