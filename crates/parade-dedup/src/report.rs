//! Dry-run reporting
//!
//! The report is the plan rendered for human sign-off: the same groups and
//! survivors the executor would commit, with zero store mutation. Console
//! text comes from `Display`; [`RunReport::to_markdown`] produces the
//! version checked into a merge log.

use std::fmt;

use serde::Serialize;

use parade_domain::VenueId;

use crate::engine::{MergePlan, PlannedGroup};
use crate::similarity::geo_distance_m;

/// A run's proposed merges, rendered for review.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Records in the snapshot the plan was built from.
    pub snapshot_size: usize,
    pub groups: Vec<GroupReport>,
}

/// One proposed duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    /// 1-based group number, shared with the run summary.
    pub number: usize,
    pub strategy: String,
    pub key: String,
    pub survivor: MemberLine,
    pub victims: Vec<MemberLine>,
}

/// One record inside a group report.
#[derive(Debug, Clone, Serialize)]
pub struct MemberLine {
    pub id: VenueId,
    pub name: String,
    pub city: Option<String>,
    pub score: u32,
    /// Metres to the survivor, when both positions are known.
    pub distance_m: Option<f64>,
    /// Why the record joined the group. Empty for the survivor and for a
    /// victim that was itself the bucket seed.
    pub matched: Option<String>,
}

impl RunReport {
    /// Render a plan. Does not touch any store.
    pub fn from_plan(plan: &MergePlan) -> Self {
        let groups = plan
            .groups
            .iter()
            .enumerate()
            .map(|(index, group)| group_report(index + 1, group))
            .collect();
        Self {
            snapshot_size: plan.snapshot_size,
            groups,
        }
    }

    /// Markdown rendering for a merge log file.
    pub fn to_markdown(&self) -> String {
        Markdown(self).to_string()
    }
}

fn group_report(number: usize, group: &PlannedGroup) -> GroupReport {
    let survivor = MemberLine {
        id: group.survivor.id,
        name: group.survivor.name.clone(),
        city: group.survivor.city.clone(),
        score: group.survivor_score,
        distance_m: None,
        matched: None,
    };
    let victims = group
        .victims
        .iter()
        .map(|victim| MemberLine {
            id: victim.record.id,
            name: victim.record.name.clone(),
            city: victim.record.city.clone(),
            score: victim.score,
            distance_m: geo_distance_m(&group.survivor, &victim.record),
            matched: victim.joined_by.as_ref().map(|why| why.to_string()),
        })
        .collect();
    GroupReport {
        number,
        strategy: group.strategy.label().to_string(),
        key: group.key.clone(),
        survivor,
        victims,
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Duplicate venue report: {} group(s) across {} record(s)",
            self.groups.len(),
            self.snapshot_size
        )?;
        for group in &self.groups {
            writeln!(f)?;
            writeln!(
                f,
                "Group {} [{}] key \"{}\"",
                group.number, group.strategy, group.key
            )?;
            writeln!(f, "  survivor: {}", member_line(&group.survivor))?;
            for victim in &group.victims {
                writeln!(f, "  victim:   {}", member_line(victim))?;
            }
        }
        Ok(())
    }
}

fn member_line(member: &MemberLine) -> String {
    let mut line = format!("{} (score {}", member.name, member.score);
    if let Some(city) = &member.city {
        line.push_str(&format!(", {}", city));
    }
    if let Some(distance) = member.distance_m {
        line.push_str(&format!(", {:.0} m away", distance));
    }
    if let Some(matched) = &member.matched {
        line.push_str(&format!(", {}", matched));
    }
    line.push(')');
    line.push_str(&format!(" [{}]", member.id));
    line
}

struct Markdown<'a>(&'a RunReport);

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "# Duplicate venue report")?;
        writeln!(f)?;
        writeln!(
            f,
            "{} group(s) across {} record(s).",
            report.groups.len(),
            report.snapshot_size
        )?;
        for group in &report.groups {
            writeln!(f)?;
            writeln!(
                f,
                "## Group {} — {} (`{}`)",
                group.number, group.strategy, group.key
            )?;
            writeln!(f)?;
            writeln!(f, "- **survivor**: {}", member_line(&group.survivor))?;
            for victim in &group.victims {
                writeln!(f, "- victim: {}", member_line(victim))?;
            }
        }
        Ok(())
    }
}
