//! In-memory store backend.
//!
//! Keeps records in insertion order so batch runs over it behave exactly
//! like runs over SQLite. Used by engine tests and anywhere a throwaway
//! store is handy.

use std::sync::Mutex;

use parade_domain::{TenantId, TenantRecord, VenueId, VenueRecord};

use crate::store::{StoreError, TenantStore, VenueFilter, VenuePatch, VenueStore};

#[derive(Default)]
struct Inner {
    venues: Vec<VenueRecord>,
    tenants: Vec<TenantRecord>,
}

/// Vec-backed implementation of [`VenueStore`] and [`TenantStore`] with the
/// same observable semantics as [`SqliteStore`].
///
/// [`SqliteStore`]: crate::sqlite_store::SqliteStore
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl VenueStore for MemoryStore {
    fn insert(&self, venue: &VenueRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.venues.iter().any(|v| v.id == venue.id) {
            return Err(StoreError::AlreadyExists(venue.id));
        }
        inner.venues.push(venue.clone());
        Ok(())
    }

    fn find_all(&self, filter: &VenueFilter) -> Result<Vec<VenueRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .venues
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect())
    }

    fn get(&self, id: VenueId) -> Result<Option<VenueRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.venues.iter().find(|v| v.id == id).cloned())
    }

    fn update(&self, id: VenueId, patch: &VenuePatch) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let venue = inner
            .venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound(id))?;
        for (field, value) in patch.iter() {
            if !venue.set_field(*field, value) {
                return Err(StoreError::Validation(format!(
                    "type mismatch for {}",
                    field.name()
                )));
            }
        }
        Ok(())
    }

    fn delete(&self, id: VenueId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let before = inner.venues.len();
        inner.venues.retain(|v| v.id != id);
        if inner.venues.len() == before {
            return Err(StoreError::NotFound(id));
        }
        // Mirror the SQLite cascade.
        inner.tenants.retain(|t| t.location_id != id);
        Ok(())
    }
}

impl TenantStore for MemoryStore {
    fn insert(&self, tenant: &TenantRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner
            .tenants
            .iter()
            .find(|t| t.location_id == tenant.location_id && t.name == tenant.name)
        {
            return Err(StoreError::AlreadyExists(existing.id));
        }
        inner.tenants.push(tenant.clone());
        Ok(())
    }

    fn find_by_parent(&self, location_id: VenueId) -> Result<Vec<TenantRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .tenants
            .iter()
            .filter(|t| t.location_id == location_id)
            .cloned()
            .collect())
    }

    fn find_by_parent_and_name(
        &self,
        location_id: VenueId,
        name: &str,
    ) -> Result<Option<TenantRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .tenants
            .iter()
            .find(|t| t.location_id == location_id && t.name == name)
            .cloned())
    }

    fn update_parent(
        &self,
        tenant_id: TenantId,
        new_location_id: VenueId,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let tenant = inner
            .tenants
            .iter_mut()
            .find(|t| t.id == tenant_id)
            .ok_or(StoreError::NotFound(tenant_id))?;
        tenant.location_id = new_location_id;
        Ok(())
    }

    fn delete(&self, tenant_id: TenantId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let before = inner.tenants.len();
        inner.tenants.retain(|t| t.id != tenant_id);
        if inner.tenants.len() == before {
            return Err(StoreError::NotFound(tenant_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parade_domain::{FieldValue, VenueField};

    #[test]
    fn insertion_order_is_stable() {
        let store = MemoryStore::new();
        let a = VenueRecord::new("Alpha");
        let b = VenueRecord::new("Beta");
        VenueStore::insert(&store, &a).unwrap();
        VenueStore::insert(&store, &b).unwrap();
        let all = store.find_all(&VenueFilter::all()).unwrap();
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[1].id, b.id);
    }

    #[test]
    fn update_rejects_kind_mismatch() {
        let store = MemoryStore::new();
        let venue = VenueRecord::new("Alpha");
        VenueStore::insert(&store, &venue).unwrap();
        let mut patch = VenuePatch::new();
        patch.set(VenueField::ParkingSpaces, FieldValue::Text("many".into()));
        let err = store.update(venue.id, &patch).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn delete_cascades_to_tenants() {
        let store = MemoryStore::new();
        let venue = VenueRecord::new("Alpha");
        VenueStore::insert(&store, &venue).unwrap();
        TenantStore::insert(&store, &TenantRecord::new(venue.id, "Boots")).unwrap();
        VenueStore::delete(&store, venue.id).unwrap();
        assert!(store.find_by_parent(venue.id).unwrap().is_empty());
    }

    #[test]
    fn duplicate_tenant_name_conflicts() {
        let store = MemoryStore::new();
        let venue = VenueRecord::new("Alpha");
        VenueStore::insert(&store, &venue).unwrap();
        TenantStore::insert(&store, &TenantRecord::new(venue.id, "Boots")).unwrap();
        let err =
            TenantStore::insert(&store, &TenantRecord::new(venue.id, "Boots")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }
}
