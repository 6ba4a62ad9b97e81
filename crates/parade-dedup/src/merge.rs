//! Group merge execution
//!
//! A merge is three strictly ordered steps per group: fill the survivor's
//! empty fields from the victims, migrate or reconcile the victims'
//! tenants, then delete the victims. The order guarantees no tenant ever
//! references a deleted venue.

use serde::Serialize;
use tracing::debug;

use parade_domain::{VenueField, VenueRecord};
use parade_store::{StoreError, TenantStore, VenuePatch, VenueStore};

/// Counters from one group's merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupMergeStats {
    pub fields_copied: usize,
    pub tenants_moved: usize,
    pub tenants_dropped: usize,
}

/// Merge the victims into the survivor.
///
/// Field reconciliation copies a victim's value only into survivor fields
/// that are currently empty; earlier victims win when several could fill
/// the same hole. The whole reconciliation lands as a single patch.
///
/// Victim tenants with a name the survivor already has are dropped (the
/// survivor's copy wins, including its category); the rest are re-parented.
pub fn merge_group(
    venues: &dyn VenueStore,
    tenants: &dyn TenantStore,
    survivor: &VenueRecord,
    victims: &[VenueRecord],
) -> Result<GroupMergeStats, StoreError> {
    let mut stats = GroupMergeStats::default();

    let mut patch = VenuePatch::new();
    for field in VenueField::ALL {
        if !survivor.field(field).is_empty() {
            continue;
        }
        for victim in victims {
            let value = victim.field(field);
            if !value.is_empty() {
                debug!(field = %field, from = %victim.id, "filling empty survivor field");
                patch.set(field, value);
                stats.fields_copied += 1;
                break;
            }
        }
    }
    if !patch.is_empty() {
        venues.update(survivor.id, &patch)?;
    }

    for victim in victims {
        for tenant in tenants.find_by_parent(victim.id)? {
            if tenants
                .find_by_parent_and_name(survivor.id, &tenant.name)?
                .is_some()
            {
                tenants.delete(tenant.id)?;
                stats.tenants_dropped += 1;
            } else {
                tenants.update_parent(tenant.id, survivor.id)?;
                stats.tenants_moved += 1;
            }
        }
        venues.delete(victim.id)?;
    }

    Ok(stats)
}
