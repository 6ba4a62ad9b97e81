//! Coarse bucketing and seed-anchored clustering
//!
//! Pairwise comparison over the whole collection would be quadratic, so
//! records are first partitioned into cheap coarse buckets (exact
//! name+postcode, shared canonical website, or city+name). Only records in
//! the same bucket are ever compared.
//!
//! Within a bucket, clustering is seed-anchored: the first record becomes
//! the seed and the rest of the pool is tested against the seed only, not
//! pairwise. Two candidates that each match the seed but not each other
//! still share a group. That is a deliberate heuristic kept from years of
//! curation, not an oversight.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use parade_domain::{VenueId, VenueRecord};

use crate::config::DedupConfig;
use crate::normalize::{normalize_name, normalize_postcode, normalize_url};
use crate::similarity::{compatible, MatchEvidence};

/// Domains shared by many distinct venues (retail chains, agents, social
/// hosts). A website on one of these says nothing about venue identity, so
/// such buckets are never clustered.
const CHAIN_DOMAINS: [&str; 34] = [
    "lidl.co.uk",
    "home.bargains",
    "completelyretail.co.uk",
    "aldi.co.uk",
    "tesco.com",
    "asda.com",
    "sainsburys.co.uk",
    "morrisons.com",
    "costa.co.uk",
    "starbucks.co.uk",
    "mcdonalds.com",
    "boots.com",
    "next.co.uk",
    "marksandspencer.com",
    "argos.co.uk",
    "currys.co.uk",
    "savills.com",
    "knightfrank.co.uk",
    "cushmanwakefield.com",
    "cbre.co.uk",
    "jll.co.uk",
    "colliers.com",
    "avisonyoung.co.uk",
    "completelygroup.com",
    "wikipedia.org",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "youtube.com",
    "tiktok.com",
    "google.com",
    "traffordcentre.co.uk",
    "themetrocentre.co.uk",
    "westfield.com",
];

/// Coarse keys used to pre-partition the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketStrategy {
    /// Exact (normalized name, normalized postcode)
    NamePostcode,
    /// Shared canonical website
    SharedWebsite,
    /// Exact (lowercased city, normalized name)
    CityName,
}

impl BucketStrategy {
    /// Default run order.
    pub const ALL: [BucketStrategy; 3] = [
        BucketStrategy::NamePostcode,
        BucketStrategy::SharedWebsite,
        BucketStrategy::CityName,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BucketStrategy::NamePostcode => "name-postcode",
            BucketStrategy::SharedWebsite => "shared-website",
            BucketStrategy::CityName => "city-name",
        }
    }

    /// The proximity radius for buckets of this strategy. A shared official
    /// website is stronger evidence than a shared name, so it earns a
    /// looser radius.
    fn radius_m(&self, config: &DedupConfig) -> f64 {
        match self {
            BucketStrategy::SharedWebsite => config.shared_url_radius_m,
            BucketStrategy::NamePostcode | BucketStrategy::CityName => config.close_radius_m,
        }
    }

    /// The coarse key for a record, or `None` when the record lacks the
    /// ingredients for this strategy (skipping it for this strategy only).
    fn key_for(&self, venue: &VenueRecord, config: &DedupConfig) -> Option<String> {
        match self {
            BucketStrategy::NamePostcode => {
                let name = normalize_name(&venue.name);
                let postcode = normalize_postcode(venue.postcode.as_deref()?);
                if name.is_empty() || postcode.len() < config.min_postcode_len {
                    return None;
                }
                Some(format!("{}|{}", name, postcode))
            }
            BucketStrategy::SharedWebsite => {
                let url = normalize_url(venue.website.as_deref()?)?;
                // Very short keys ("t.co") and chain domains bucket half the
                // country together.
                if url.len() <= 5 || is_chain_domain(&url) {
                    return None;
                }
                Some(url)
            }
            BucketStrategy::CityName => {
                let city = venue.city.as_deref()?.trim().to_lowercase();
                let name = normalize_name(&venue.name);
                if city.is_empty() || name.is_empty() {
                    return None;
                }
                Some(format!("{}|{}", city, name))
            }
        }
    }
}

fn is_chain_domain(normalized_url: &str) -> bool {
    let domain = normalized_url.split('/').next().unwrap_or(normalized_url);
    CHAIN_DOMAINS.iter().any(|chain| domain.contains(chain))
}

/// A proposed duplicate group.
///
/// `members` keeps snapshot order with the seed first; `evidence[i]` records
/// why `members[i + 1]` joined (the seed carries no evidence).
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    pub strategy: BucketStrategy,
    pub key: String,
    pub members: Vec<VenueRecord>,
    pub evidence: Vec<MatchEvidence>,
}

/// Bucket the snapshot by each strategy in turn and pool every bucket from
/// its seed.
///
/// Records claimed by an earlier group are invisible to later strategies,
/// so a single run never schedules the same venue into two merges. Group
/// order is deterministic: strategies in the given order, buckets in
/// first-seen snapshot order.
pub fn build_candidate_groups(
    snapshot: &[VenueRecord],
    strategies: &[BucketStrategy],
    config: &DedupConfig,
) -> Vec<CandidateGroup> {
    let mut claimed: HashSet<VenueId> = HashSet::new();
    let mut groups = Vec::new();

    for strategy in strategies {
        let mut buckets: HashMap<String, Vec<&VenueRecord>> = HashMap::new();
        let mut bucket_order: Vec<String> = Vec::new();
        for venue in snapshot {
            if claimed.contains(&venue.id) {
                continue;
            }
            let Some(key) = strategy.key_for(venue, config) else {
                continue;
            };
            let bucket = buckets.entry(key.clone()).or_default();
            if bucket.is_empty() {
                bucket_order.push(key);
            }
            bucket.push(venue);
        }

        let before = groups.len();
        for key in &bucket_order {
            let Some(bucket) = buckets.remove(key) else {
                continue;
            };
            if bucket.len() < 2 {
                continue;
            }
            pool_bucket(*strategy, key, bucket, config, &mut claimed, &mut groups);
        }
        debug!(
            strategy = strategy.label(),
            groups = groups.len() - before,
            "bucketing pass complete"
        );
    }

    groups
}

/// Seed-anchored pooling: pop the first record as seed, sweep the remaining
/// pool once against the seed, repeat until the pool is drained.
fn pool_bucket(
    strategy: BucketStrategy,
    key: &str,
    bucket: Vec<&VenueRecord>,
    config: &DedupConfig,
    claimed: &mut HashSet<VenueId>,
    groups: &mut Vec<CandidateGroup>,
) {
    let radius_m = strategy.radius_m(config);
    let mut pool = bucket;

    while !pool.is_empty() {
        let seed = pool.remove(0);
        let mut members = vec![seed.clone()];
        let mut evidence = Vec::new();
        let mut rest = Vec::with_capacity(pool.len());

        for candidate in pool {
            match compatible(seed, candidate, radius_m, config) {
                Some(why) => {
                    members.push(candidate.clone());
                    evidence.push(why);
                }
                None => rest.push(candidate),
            }
        }
        pool = rest;

        if members.len() > 1 {
            claimed.extend(members.iter().map(|m| m.id));
            groups.push(CandidateGroup {
                strategy,
                key: key.to_string(),
                members,
                evidence,
            });
        }
    }
}
