//! Configuration for the deduplication engine
//!
//! All matching thresholds and survivor-scoring weights live here so a run
//! can be tuned without touching the engine. Defaults mirror the values the
//! venue directory has been curated with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matching thresholds and scoring weights for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Metres between two known positions for a generic proximity match
    pub close_radius_m: f64,
    /// Metres allowed when the bucket is anchored by a shared canonical
    /// website; an official URL is stronger evidence than a name, so the
    /// radius is looser
    pub shared_url_radius_m: f64,
    /// Name evidence is distrusted when the records are known to be further
    /// apart than this (metres); two distinct "Westfield" sites must not
    /// merge on name alone
    pub name_distance_cap_m: f64,
    /// Maximum Levenshtein distance between normalized names
    pub max_name_distance: usize,
    /// Normalized postcodes shorter than this are too ambiguous to bucket on
    pub min_postcode_len: usize,
    /// Substring name evidence requires the shorter normalized name to be at
    /// least this long
    pub min_substring_len: usize,
    /// Survivor scoring weights
    pub weights: ScoreWeights,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            close_radius_m: 500.0,
            shared_url_radius_m: 5_000.0,
            name_distance_cap_m: 20_000.0,
            max_name_distance: 5,
            min_postcode_len: 5,
            min_substring_len: 4,
            weights: ScoreWeights::default(),
        }
    }
}

/// Weights added to a record's enrichment score when the field group is
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Any social link (facebook, instagram, twitter, youtube, tiktok)
    pub social: u32,
    /// A management contact (management or management_email)
    pub management: u32,
    /// A phone number
    pub phone: u32,
    /// A known (non-sentinel) position
    pub position: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            social: 5,
            management: 3,
            phone: 1,
            position: 2,
        }
    }
}

impl DedupConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.close_radius_m.is_finite() || self.close_radius_m <= 0.0 {
            return Err(ConfigError::OutOfRange(
                "close_radius_m must be a positive number of metres".to_string(),
            ));
        }
        if !self.shared_url_radius_m.is_finite() || self.shared_url_radius_m < self.close_radius_m
        {
            return Err(ConfigError::InvalidThresholds(
                "shared_url_radius_m must be at least close_radius_m".to_string(),
            ));
        }
        if !self.name_distance_cap_m.is_finite()
            || self.name_distance_cap_m < self.shared_url_radius_m
        {
            return Err(ConfigError::InvalidThresholds(
                "name_distance_cap_m must be at least shared_url_radius_m".to_string(),
            ));
        }
        if self.min_substring_len == 0 {
            return Err(ConfigError::OutOfRange(
                "min_substring_len must be at least 1".to_string(),
            ));
        }
        if self.min_postcode_len == 0 {
            return Err(ConfigError::OutOfRange(
                "min_postcode_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration validation error
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Threshold values are invalid relative to each other
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}
