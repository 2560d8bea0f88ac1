//! Grouping and top-N ranking
//!
//! Rows are partitioned by group label in order of first appearance. Within
//! a group, overselling rows are ranked by result descending and
//! underselling rows by result ascending (most negative first). Equal
//! results fall back to SKU order, then to source order.

use std::cmp::Ordering;
use std::collections::HashMap;

use fcreport_core::{EnrichedRecord, GroupLabel, GroupRanking, RankedRecord, Status, DEFAULT_TOP_N};

/// Ranking configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankingOptions {
    /// Rows kept per table
    pub top_n: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Partition rows by group label, groups in first-seen order
pub fn group_records(records: &[EnrichedRecord]) -> Vec<(GroupLabel, Vec<&EnrichedRecord>)> {
    let mut groups: Vec<(GroupLabel, Vec<&EnrichedRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.group()).or_insert_with(|| {
            groups.push((record.group().to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
}

/// Rank a single group's members
pub fn rank_group(label: &str, members: &[&EnrichedRecord], top_n: usize) -> GroupRanking {
    let overselling = top_by(members, Status::Overselling, top_n, |a, b| {
        b.result.total_cmp(&a.result)
    });
    let underselling = top_by(members, Status::Underselling, top_n, |a, b| {
        a.result.total_cmp(&b.result)
    });

    GroupRanking {
        label: label.to_string(),
        member_count: members.len(),
        overselling,
        underselling,
    }
}

/// Group and rank every row
pub fn rank_all(records: &[EnrichedRecord], options: RankingOptions) -> Vec<GroupRanking> {
    group_records(records)
        .iter()
        .map(|(label, members)| rank_group(label, members, options.top_n))
        .collect()
}

fn top_by(
    members: &[&EnrichedRecord],
    status: Status,
    top_n: usize,
    by_result: impl Fn(&EnrichedRecord, &EnrichedRecord) -> Ordering,
) -> Vec<RankedRecord> {
    let mut selected: Vec<&EnrichedRecord> = members
        .iter()
        .copied()
        .filter(|r| r.status == status)
        .collect();

    // sort_by is stable, so full ties keep source order
    selected.sort_by(|a, b| by_result(a, b).then_with(|| a.sku().cmp(b.sku())));

    selected
        .into_iter()
        .take(top_n)
        .map(|r| RankedRecord::new(r.clone()))
        .collect()
}
