//! parade-dedup: entity resolution for the parade venue directory
//!
//! Venue records arrive from manual entry, CSV imports, scrapers, and place
//! APIs, and the same shopping centre routinely shows up several times with
//! different spellings or geocodes. This crate finds those duplicates and
//! consolidates them:
//! - normalization of names, websites, and postcodes into comparable keys
//! - string and geographic similarity with an explainable match predicate
//! - coarse bucketing plus seed-anchored clustering into duplicate groups
//! - survivor selection by enrichment score
//! - ordered merge execution that never orphans a tenant
//! - a dry-run report for human sign-off before anything mutates
//!
//! Matching is deterministic and heuristic; there is no learned model, and
//! every decision in the report names the rule that made it.

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod report;
pub mod similarity;
pub mod survivor;

pub use cluster::{build_candidate_groups, BucketStrategy, CandidateGroup};
pub use config::{ConfigError, DedupConfig, ScoreWeights};
pub use engine::{DedupEngine, GroupFailure, MergePlan, PlannedGroup, PlannedVictim, RunSummary};
pub use error::{DedupError, Result};
pub use merge::{merge_group, GroupMergeStats};
pub use normalize::{normalize_name, normalize_postcode, normalize_url};
pub use report::{GroupReport, MemberLine, RunReport};
pub use similarity::{compatible, geo_distance_m, name_distance, MatchEvidence};
pub use survivor::{enrichment_score, select_survivor};
