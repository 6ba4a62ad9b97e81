//! Survivor selection
//!
//! Every record in a duplicate group is scored on how much curated data it
//! carries; the richest record survives and absorbs the rest. Ties keep the
//! earliest record in snapshot order, which makes reruns reproducible.

use parade_domain::VenueRecord;

use crate::config::ScoreWeights;

/// Heuristic measure of how complete a record's high-value fields are.
pub fn enrichment_score(venue: &VenueRecord, weights: &ScoreWeights) -> u32 {
    let mut score = 0;
    if has_text(&venue.facebook)
        || has_text(&venue.instagram)
        || has_text(&venue.twitter)
        || has_text(&venue.youtube)
        || has_text(&venue.tiktok)
    {
        score += weights.social;
    }
    if has_text(&venue.management) || has_text(&venue.management_email) {
        score += weights.management;
    }
    if has_text(&venue.phone) {
        score += weights.phone;
    }
    if venue.position().is_some() {
        score += weights.position;
    }
    score
}

/// Index of the survivor within a group: highest enrichment score, with
/// ties going to the earliest member.
///
/// `members` must not be empty.
pub fn select_survivor(members: &[VenueRecord], weights: &ScoreWeights) -> usize {
    let mut best = 0;
    let mut best_score = enrichment_score(&members[0], weights);
    for (index, member) in members.iter().enumerate().skip(1) {
        let score = enrichment_score(member, weights);
        if score > best_score {
            best = index;
            best_score = score;
        }
    }
    best
}

fn has_text(slot: &Option<String>) -> bool {
    slot.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DedupConfig;

    fn weights() -> ScoreWeights {
        DedupConfig::default().weights
    }

    #[test]
    fn scores_accumulate_per_field_group() {
        let mut venue = VenueRecord::new("Touchwood");
        assert_eq!(enrichment_score(&venue, &weights()), 0);

        venue.phone = Some("0121 709 6900".into());
        assert_eq!(enrichment_score(&venue, &weights()), 1);

        venue.management = Some("Lendlease".into());
        assert_eq!(enrichment_score(&venue, &weights()), 4);

        venue.instagram = Some("https://instagram.com/touchwood".into());
        assert_eq!(enrichment_score(&venue, &weights()), 9);

        venue.latitude = 52.4118;
        venue.longitude = -1.7776;
        assert_eq!(enrichment_score(&venue, &weights()), 11);
    }

    #[test]
    fn multiple_social_links_count_once() {
        let mut venue = VenueRecord::new("Touchwood");
        venue.facebook = Some("fb".into());
        venue.twitter = Some("tw".into());
        venue.tiktok = Some("tt".into());
        assert_eq!(enrichment_score(&venue, &weights()), 5);
    }

    #[test]
    fn blank_fields_do_not_score() {
        let mut venue = VenueRecord::new("Touchwood");
        venue.phone = Some("   ".into());
        venue.facebook = Some("".into());
        assert_eq!(enrichment_score(&venue, &weights()), 0);
    }

    #[test]
    fn richest_record_survives() {
        let mut poor = VenueRecord::new("Touchwood");
        poor.phone = Some("0121 709 6900".into());
        let mut rich = VenueRecord::new("Touchwood Shopping Centre");
        rich.facebook = Some("https://facebook.com/touchwoodsolihull".into());
        assert_eq!(select_survivor(&[poor, rich], &weights()), 1);
    }

    #[test]
    fn ties_keep_the_first_seen_record() {
        let a = VenueRecord::new("Alpha");
        let b = VenueRecord::new("Beta");
        let c = VenueRecord::new("Gamma");
        assert_eq!(select_survivor(&[a, b, c], &weights()), 0);
    }
}
