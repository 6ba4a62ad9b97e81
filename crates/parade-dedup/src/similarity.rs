//! Pairwise similarity and the compatibility predicate
//!
//! Distance comes in two flavours: Levenshtein over normalized names and
//! Haversine metres over known positions. Neither alone decides a match;
//! [`compatible`] combines them in a fixed priority order.

use std::fmt;

use geo::{HaversineDistance, Point};
use serde::Serialize;
use strsim::levenshtein;

use parade_domain::VenueRecord;

use crate::config::DedupConfig;
use crate::normalize::normalize_name;

/// Levenshtein edit distance (insert/delete/substitute at cost 1).
pub fn name_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

/// Great-circle distance in metres, or `None` when either venue has no
/// known position.
///
/// `None` is a real outcome, not an error: it means "we cannot tell how far
/// apart these are", and callers must branch on it rather than treat it as
/// zero metres.
pub fn geo_distance_m(a: &VenueRecord, b: &VenueRecord) -> Option<f64> {
    let pa = a.position()?;
    let pb = b.position()?;
    // geo points are (x, y) = (longitude, latitude)
    let pa = Point::new(pa.longitude, pa.latitude);
    let pb = Point::new(pb.longitude, pb.latitude);
    Some(pa.haversine_distance(&pb))
}

/// How a candidate was judged to duplicate the seed of its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchEvidence {
    /// Both positions known and within the bucket's radius.
    Proximity { meters: f64 },
    /// At least one position unknown, same city.
    SameCity { city: String },
    /// Normalized names within the edit-distance bound.
    NameDistance { distance: usize },
    /// One normalized name contains the other.
    NameContainment,
}

impl fmt::Display for MatchEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvidence::Proximity { meters } => write!(f, "within {:.0} m", meters),
            MatchEvidence::SameCity { city } => write!(f, "same city ({})", city),
            MatchEvidence::NameDistance { distance } => {
                write!(f, "name edit distance {}", distance)
            }
            MatchEvidence::NameContainment => write!(f, "name containment"),
        }
    }
}

/// Decide whether `candidate` belongs in `seed`'s duplicate group.
///
/// Rules are evaluated in priority order; the first that holds wins:
/// 1. both positions known and closer than `radius_m` (the caller passes a
///    looser radius when the bucket shares a canonical website)
/// 2. either position unknown and both records name the same city
///    (case-insensitive)
/// 3. strong name match: normalized names within the edit bound, or one
///    containing the other. Trusted only when the separation is unknown or
///    under the cap, so same-named venues in different cities stay apart.
///
/// Records whose names normalize to nothing (all stopwords) never match by
/// name, and containment needs the shorter name to carry some substance.
pub fn compatible(
    seed: &VenueRecord,
    candidate: &VenueRecord,
    radius_m: f64,
    config: &DedupConfig,
) -> Option<MatchEvidence> {
    let distance = geo_distance_m(seed, candidate);

    if let Some(meters) = distance {
        if meters < radius_m {
            return Some(MatchEvidence::Proximity { meters });
        }
    }

    if distance.is_none() {
        if let (Some(a), Some(b)) = (&seed.city, &candidate.city) {
            let a = a.trim();
            let b = b.trim();
            if !a.is_empty() && a.eq_ignore_ascii_case(b) {
                return Some(MatchEvidence::SameCity {
                    city: a.to_lowercase(),
                });
            }
        }
    }

    let names_trusted = match distance {
        None => true,
        Some(meters) => meters < config.name_distance_cap_m,
    };
    if names_trusted {
        let seed_name = normalize_name(&seed.name);
        let candidate_name = normalize_name(&candidate.name);
        if !seed_name.is_empty() && !candidate_name.is_empty() {
            let edit = name_distance(&seed_name, &candidate_name);
            if edit <= config.max_name_distance {
                return Some(MatchEvidence::NameDistance { distance: edit });
            }
            let shorter = seed_name.len().min(candidate_name.len());
            if shorter >= config.min_substring_len
                && (seed_name.contains(&candidate_name) || candidate_name.contains(&seed_name))
            {
                return Some(MatchEvidence::NameContainment);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_at(name: &str, lat: f64, lon: f64) -> VenueRecord {
        let mut venue = VenueRecord::new(name);
        venue.latitude = lat;
        venue.longitude = lon;
        venue
    }

    fn venue_in(name: &str, city: &str) -> VenueRecord {
        let mut venue = VenueRecord::new(name);
        venue.city = Some(city.into());
        venue
    }

    #[test]
    fn test_levenshtein_reference_value() {
        assert_eq!(name_distance("kitten", "sitting"), 3);
        assert_eq!(name_distance("same", "same"), 0);
    }

    #[test]
    fn test_geo_distance_symmetric_and_zero() {
        let a = venue_at("A", 53.7997, -1.5492);
        let b = venue_at("B", 53.7586, -1.5736);
        let ab = geo_distance_m(&a, &b).unwrap();
        let ba = geo_distance_m(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 0.0);
        assert_eq!(geo_distance_m(&a, &a), Some(0.0));
    }

    #[test]
    fn test_geo_distance_unknown_for_sentinel() {
        let known = venue_at("A", 53.7997, -1.5492);
        let unknown = venue_at("B", 0.0, 0.0);
        assert_eq!(geo_distance_m(&known, &unknown), None);
        assert_eq!(geo_distance_m(&unknown, &known), None);
        assert_eq!(geo_distance_m(&unknown, &unknown), None);
    }

    #[test]
    fn test_proximity_wins_when_close() {
        let config = DedupConfig::default();
        // Two points in central Leeds, roughly 200 m apart.
        let a = venue_at("Core", 53.7997, -1.5492);
        let b = venue_at("St Johns", 53.7980, -1.5480);
        let evidence = compatible(&a, &b, config.close_radius_m, &config).unwrap();
        match evidence {
            MatchEvidence::Proximity { meters } => {
                assert!(meters > 100.0 && meters < 500.0, "got {meters}");
            }
            other => panic!("expected proximity, got {other:?}"),
        }
    }

    #[test]
    fn test_radius_depends_on_bucket_kind() {
        let config = DedupConfig::default();
        // About 3.4 km apart: beyond the generic radius, inside the
        // shared-website radius.
        let a = venue_at("Crown Point", 53.7997, -1.5492);
        let b = venue_at("Crossgates", 53.77, -1.56);
        assert!(
            !matches!(
                compatible(&a, &b, config.close_radius_m, &config),
                Some(MatchEvidence::Proximity { .. })
            ),
            "generic radius should not pass at 3.4 km"
        );
        assert!(matches!(
            compatible(&a, &b, config.shared_url_radius_m, &config),
            Some(MatchEvidence::Proximity { .. })
        ));
    }

    #[test]
    fn test_same_city_when_distance_unknown() {
        let config = DedupConfig::default();
        let a = venue_in("Touchwood", "Solihull");
        let b = venue_in("Mell Square", "solihull");
        assert_eq!(
            compatible(&a, &b, config.close_radius_m, &config),
            Some(MatchEvidence::SameCity {
                city: "solihull".into()
            })
        );
    }

    #[test]
    fn test_city_match_requires_both_cities() {
        let config = DedupConfig::default();
        let a = venue_in("Queensgate", "Peterborough");
        let b = VenueRecord::new("Queensgate Centre");
        // No city on b: rule 2 cannot fire, falls through to the name rule.
        assert_eq!(
            compatible(&a, &b, config.close_radius_m, &config),
            Some(MatchEvidence::NameDistance { distance: 0 })
        );
    }

    #[test]
    fn test_name_match_with_unknown_distance() {
        let config = DedupConfig::default();
        let a = venue_in("White Rose Shopping Centre", "Leeds");
        let b = venue_in("White Rose Center", "Morley");
        assert_eq!(
            compatible(&a, &b, config.close_radius_m, &config),
            Some(MatchEvidence::NameDistance { distance: 0 })
        );
    }

    #[test]
    fn test_name_match_distrusted_when_far_apart() {
        let config = DedupConfig::default();
        // Same brand, Leeds vs London: roughly 270 km.
        let a = venue_at("Westfield", 53.7997, -1.5492);
        let b = venue_at("Westfield", 51.5074, -0.1278);
        assert_eq!(compatible(&a, &b, config.close_radius_m, &config), None);
    }

    #[test]
    fn test_name_match_trusted_within_cap() {
        let config = DedupConfig::default();
        // About 3.4 km apart with different cities recorded: proximity fails
        // at the generic radius, but names are trusted under the 20 km cap.
        let mut a = venue_at("White Rose Shopping Centre", 53.7997, -1.5492);
        a.city = Some("Leeds".into());
        let mut b = venue_at("White Rose Centre", 53.77, -1.56);
        b.city = Some("Morley".into());
        assert_eq!(
            compatible(&a, &b, config.close_radius_m, &config),
            Some(MatchEvidence::NameDistance { distance: 0 })
        );
    }

    #[test]
    fn test_containment_for_long_names() {
        let config = DedupConfig::default();
        let a = venue_in("Bullring", "Birmingham");
        let b = venue_in("Bullring & Grand Central Estate", "Brum");
        assert_eq!(
            compatible(&a, &b, config.close_radius_m, &config),
            Some(MatchEvidence::NameContainment)
        );
    }

    #[test]
    fn test_containment_guard_rejects_tiny_names() {
        let config = DedupConfig::default();
        let a = venue_in("Axe", "Axminster");
        let b = venue_in("Axminster Axe Quarter", "Seaton");
        assert_eq!(compatible(&a, &b, config.close_radius_m, &config), None);
    }

    #[test]
    fn test_stopword_only_names_never_match_by_name() {
        let config = DedupConfig::default();
        let a = venue_in("The Shopping Centre", "Leeds");
        let b = venue_in("Retail Park", "Bradford");
        assert_eq!(compatible(&a, &b, config.close_radius_m, &config), None);
    }
}
