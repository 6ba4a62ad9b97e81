//! Batch orchestration
//!
//! One run is: load the snapshot once, build duplicate groups, pick a
//! survivor per group, then either render the plan for review (dry run) or
//! commit it group by group. A group that fails to merge is logged and
//! counted; the rest of the batch continues.
//!
//! The engine assumes it is the only writer while it runs. Enrichment
//! scripts mutating the store mid-batch can resurrect a deleted victim or
//! strand a tenant; schedule runs when nothing else is active.

use serde::Serialize;
use tracing::{info, warn};

use parade_domain::{VenueId, VenueRecord};
use parade_store::{TenantStore, VenueFilter, VenueStore};

use crate::cluster::{build_candidate_groups, BucketStrategy, CandidateGroup};
use crate::config::DedupConfig;
use crate::error::Result;
use crate::merge::{merge_group, GroupMergeStats};
use crate::similarity::MatchEvidence;
use crate::survivor::{enrichment_score, select_survivor};

/// The proposed merges for one run: what the executor would commit and the
/// report renders.
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Records in the snapshot the plan was built from.
    pub snapshot_size: usize,
    pub groups: Vec<PlannedGroup>,
}

/// One duplicate group with its survivor already chosen.
#[derive(Debug, Clone)]
pub struct PlannedGroup {
    pub strategy: BucketStrategy,
    pub key: String,
    pub survivor: VenueRecord,
    pub survivor_score: u32,
    /// The records to merge into the survivor, in snapshot order.
    pub victims: Vec<PlannedVictim>,
}

/// A record scheduled for merging into its group's survivor.
#[derive(Debug, Clone)]
pub struct PlannedVictim {
    pub record: VenueRecord,
    pub score: u32,
    /// Why the record joined the group; `None` when it was the bucket seed.
    pub joined_by: Option<MatchEvidence>,
}

/// End-of-run tally.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub groups_found: usize,
    pub groups_merged: usize,
    pub groups_failed: usize,
    pub fields_copied: usize,
    pub tenants_moved: usize,
    pub tenants_dropped: usize,
    pub failures: Vec<GroupFailure>,
}

/// One group that could not be merged. The group is left untouched for the
/// next run; there are no retries within a run.
#[derive(Debug, Clone, Serialize)]
pub struct GroupFailure {
    /// 1-based group number, matching the report.
    pub group: usize,
    pub survivor: VenueId,
    pub error: String,
}

/// The entity-resolution engine over injected stores.
pub struct DedupEngine<'a> {
    venues: &'a dyn VenueStore,
    tenants: &'a dyn TenantStore,
    config: DedupConfig,
    strategies: Vec<BucketStrategy>,
}

impl<'a> DedupEngine<'a> {
    /// Build an engine over the given stores. Fails when the configuration
    /// does not validate.
    pub fn new(
        venues: &'a dyn VenueStore,
        tenants: &'a dyn TenantStore,
        config: DedupConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            venues,
            tenants,
            config,
            strategies: BucketStrategy::ALL.to_vec(),
        })
    }

    /// Restrict the run to the given bucketing strategies, in order.
    pub fn with_strategies(mut self, strategies: Vec<BucketStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Load the snapshot and compute the merge plan. Read-only: nothing in
    /// the store changes until [`DedupEngine::execute`].
    pub fn plan(&self) -> Result<MergePlan> {
        let snapshot = self.venues.find_all(&VenueFilter::all())?;
        info!(records = snapshot.len(), "snapshot loaded");

        let groups = build_candidate_groups(&snapshot, &self.strategies, &self.config);
        let planned: Vec<PlannedGroup> = groups
            .iter()
            .map(|group| self.plan_group(group))
            .collect();
        info!(groups = planned.len(), "duplicate groups found");

        Ok(MergePlan {
            snapshot_size: snapshot.len(),
            groups: planned,
        })
    }

    fn plan_group(&self, group: &CandidateGroup) -> PlannedGroup {
        let weights = &self.config.weights;
        let survivor_index = select_survivor(&group.members, weights);
        let survivor = group.members[survivor_index].clone();
        let survivor_score = enrichment_score(&survivor, weights);

        let victims = group
            .members
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != survivor_index)
            .map(|(index, member)| PlannedVictim {
                record: member.clone(),
                score: enrichment_score(member, weights),
                // evidence[i] explains members[i + 1]; the seed carries none
                joined_by: index.checked_sub(1).map(|i| group.evidence[i].clone()),
            })
            .collect();

        PlannedGroup {
            strategy: group.strategy,
            key: group.key.clone(),
            survivor,
            survivor_score,
            victims,
        }
    }

    /// Commit a plan group by group.
    ///
    /// A failed group is recorded in the summary and skipped; later groups
    /// still run. Reruns pick up whatever was left unmerged.
    pub fn execute(&self, plan: &MergePlan) -> RunSummary {
        let mut summary = RunSummary {
            groups_found: plan.groups.len(),
            ..RunSummary::default()
        };

        for (index, group) in plan.groups.iter().enumerate() {
            let number = index + 1;
            let victims: Vec<VenueRecord> =
                group.victims.iter().map(|v| v.record.clone()).collect();
            match merge_group(self.venues, self.tenants, &group.survivor, &victims) {
                Ok(stats) => {
                    summary.groups_merged += 1;
                    summary.absorb(stats);
                    info!(
                        group = number,
                        survivor = %group.survivor.id,
                        victims = victims.len(),
                        fields = stats.fields_copied,
                        "group merged"
                    );
                }
                Err(err) => {
                    warn!(
                        group = number,
                        survivor = %group.survivor.id,
                        error = %err,
                        "group merge failed, continuing"
                    );
                    summary.groups_failed += 1;
                    summary.failures.push(GroupFailure {
                        group: number,
                        survivor: group.survivor.id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            found = summary.groups_found,
            merged = summary.groups_merged,
            failed = summary.groups_failed,
            "run complete"
        );
        summary
    }

    /// Plan and commit in one call.
    pub fn run(&self) -> Result<RunSummary> {
        let plan = self.plan()?;
        Ok(self.execute(&plan))
    }
}

impl RunSummary {
    fn absorb(&mut self, stats: GroupMergeStats) {
        self.fields_copied += stats.fields_copied;
        self.tenants_moved += stats.tenants_moved;
        self.tenants_dropped += stats.tenants_dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parade_domain::TenantRecord;
    use parade_store::{MemoryStore, StoreError, TenantStore, VenuePatch};

    fn seeded(venues: &[VenueRecord]) -> MemoryStore {
        let store = MemoryStore::new();
        for venue in venues {
            VenueStore::insert(&store, venue).unwrap();
        }
        store
    }

    fn touchwood_pair() -> (VenueRecord, VenueRecord) {
        let mut a = VenueRecord::new("Touchwood");
        a.city = Some("Solihull".into());
        a.website = Some("https://touchwoodsolihull.co.uk".into());
        a.phone = Some("0121 709 6900".into());
        let mut b = VenueRecord::new("Touchwood Shopping Centre");
        b.city = Some("Solihull".into());
        b.facebook = Some("https://facebook.com/touchwoodsolihull".into());
        b.instagram = Some("https://instagram.com/touchwoodsolihull".into());
        (a, b)
    }

    #[test]
    fn plan_is_read_only() {
        let (a, b) = touchwood_pair();
        let store = seeded(&[a.clone(), b.clone()]);
        let engine = DedupEngine::new(&store, &store, DedupConfig::default()).unwrap();
        let plan = engine.plan().unwrap();
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(store.find_all(&VenueFilter::all()).unwrap().len(), 2);
    }

    #[test]
    fn richer_record_survives_and_absorbs() {
        let (a, b) = touchwood_pair();
        let store = seeded(&[a.clone(), b.clone()]);
        let engine = DedupEngine::new(&store, &store, DedupConfig::default()).unwrap();

        let plan = engine.plan().unwrap();
        let group = &plan.groups[0];
        assert_eq!(group.survivor.id, b.id);
        assert_eq!(group.survivor_score, 5);
        assert_eq!(group.victims.len(), 1);
        assert_eq!(group.victims[0].score, 1);

        let summary = engine.execute(&plan);
        assert_eq!(summary.groups_merged, 1);
        assert_eq!(summary.groups_failed, 0);

        let remaining = store.find_all(&VenueFilter::all()).unwrap();
        assert_eq!(remaining.len(), 1);
        let merged = &remaining[0];
        assert_eq!(merged.id, b.id);
        assert_eq!(merged.phone.as_deref(), Some("0121 709 6900"));
        assert!(merged.facebook.is_some());
        assert!(merged.instagram.is_some());
    }

    #[test]
    fn rerun_finds_nothing_after_merge() {
        let (a, b) = touchwood_pair();
        let store = seeded(&[a, b]);
        let engine = DedupEngine::new(&store, &store, DedupConfig::default()).unwrap();
        engine.run().unwrap();

        let plan = engine.plan().unwrap();
        assert!(plan.groups.is_empty(), "merged collection is a fixed point");
    }

    #[test]
    fn seed_victims_carry_no_evidence() {
        // The seed is poorer than the second record, so it becomes a victim
        // without a joined_by.
        let (a, b) = touchwood_pair();
        let store = seeded(&[a.clone(), b]);
        let engine = DedupEngine::new(&store, &store, DedupConfig::default()).unwrap();
        let plan = engine.plan().unwrap();
        let victim = &plan.groups[0].victims[0];
        assert_eq!(victim.record.id, a.id);
        assert!(victim.joined_by.is_none());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let store = MemoryStore::new();
        let config = DedupConfig {
            close_radius_m: -5.0,
            ..DedupConfig::default()
        };
        assert!(DedupEngine::new(&store, &store, config).is_err());
    }

    /// Delegates to an inner store but refuses to delete one venue.
    struct GrudgeStore {
        inner: MemoryStore,
        grudge: VenueId,
    }

    impl VenueStore for GrudgeStore {
        fn insert(&self, venue: &VenueRecord) -> std::result::Result<(), StoreError> {
            VenueStore::insert(&self.inner, venue)
        }
        fn find_all(
            &self,
            filter: &VenueFilter,
        ) -> std::result::Result<Vec<VenueRecord>, StoreError> {
            self.inner.find_all(filter)
        }
        fn get(&self, id: VenueId) -> std::result::Result<Option<VenueRecord>, StoreError> {
            self.inner.get(id)
        }
        fn update(&self, id: VenueId, patch: &VenuePatch) -> std::result::Result<(), StoreError> {
            self.inner.update(id, patch)
        }
        fn delete(&self, id: VenueId) -> std::result::Result<(), StoreError> {
            if id == self.grudge {
                return Err(StoreError::Storage("disk full".into()));
            }
            VenueStore::delete(&self.inner, id)
        }
    }

    #[test]
    fn one_failing_group_does_not_stop_the_batch() {
        let (a, b) = touchwood_pair();
        let mut c = VenueRecord::new("Queensgate");
        c.city = Some("Peterborough".into());
        let mut d = VenueRecord::new("Queensgate Shopping Centre");
        d.city = Some("Peterborough".into());
        d.phone = Some("01733 311 666".into());

        let inner = MemoryStore::new();
        for venue in [&a, &b, &c, &d] {
            VenueStore::insert(&inner, venue).unwrap();
        }
        // Poison the first group: its victim (record a) cannot be deleted.
        let venues = GrudgeStore { inner, grudge: a.id };

        let tenants = MemoryStore::new();
        let engine = DedupEngine::new(&venues, &tenants, DedupConfig::default()).unwrap();
        let summary = engine.run().unwrap();

        assert_eq!(summary.groups_found, 2);
        assert_eq!(summary.groups_merged, 1);
        assert_eq!(summary.groups_failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].error.contains("disk full"));

        // The poisoned group is left for the next run; the other merged.
        let remaining = venues.find_all(&VenueFilter::all()).unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().any(|v| v.id == d.id));
        assert!(!remaining.iter().any(|v| v.id == c.id));
    }

    #[test]
    fn summary_totals_cover_tenant_moves() {
        let (a, b) = touchwood_pair();
        let store = seeded(&[a.clone(), b.clone()]);
        TenantStore::insert(&store, &TenantRecord::new(a.id, "Boots")).unwrap();
        TenantStore::insert(&store, &TenantRecord::new(a.id, "Next")).unwrap();
        TenantStore::insert(&store, &TenantRecord::new(b.id, "Boots")).unwrap();

        let engine = DedupEngine::new(&store, &store, DedupConfig::default()).unwrap();
        let summary = engine.run().unwrap();
        assert_eq!(summary.tenants_moved, 1);
        assert_eq!(summary.tenants_dropped, 1);
        assert_eq!(store.find_by_parent(b.id).unwrap().len(), 2);
    }
}
