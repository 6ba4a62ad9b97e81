//! Shared builders for dedup integration tests

use parade_domain::{TenantRecord, VenueRecord};
use parade_store::{MemoryStore, StoreError, TenantStore, VenueStore};

/// A venue with a name and city, positions unknown.
pub fn venue_in(name: &str, city: &str) -> VenueRecord {
    let mut v = VenueRecord::new(name);
    v.city = Some(city.into());
    v
}

/// A venue pinned to real coordinates.
pub fn venue_at(name: &str, lat: f64, lon: f64) -> VenueRecord {
    let mut v = VenueRecord::new(name);
    v.latitude = lat;
    v.longitude = lon;
    v
}

/// Seed a fresh in-memory store with venues and their tenants.
pub fn seeded_store(
    venues: &[VenueRecord],
    tenants: &[TenantRecord],
) -> Result<MemoryStore, StoreError> {
    let store = MemoryStore::new();
    for venue in venues {
        VenueStore::insert(&store, venue)?;
    }
    for tenant in tenants {
        TenantStore::insert(&store, tenant)?;
    }
    Ok(store)
}

/// The Touchwood pair used across end-to-end tests: a sparse record with a
/// phone and website, and a rich record carrying social links.
pub fn touchwood_records() -> (VenueRecord, VenueRecord) {
    let mut sparse = venue_in("Touchwood", "Solihull");
    sparse.website = Some("https://touchwoodsolihull.co.uk".into());
    sparse.phone = Some("0121 709 6900".into());

    let mut rich = venue_in("Touchwood Shopping Centre", "Solihull");
    rich.facebook = Some("https://facebook.com/touchwoodsolihull".into());
    rich.instagram = Some("https://instagram.com/touchwoodsolihull".into());

    (sparse, rich)
}
