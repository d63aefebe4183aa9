use chrono::{DateTime, Utc};
use tracing::debug;

use crate::pr::RawPullRequest;

/// A closed PR with its derived turnaround duration. Built once during the
/// compute stage and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TurnaroundRecord {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    /// True iff the PR was merged rather than closed outright
    pub merged: bool,
    /// Label names in API order, duplicates kept
    pub labels: Vec<String>,
    /// Hours between creation and close, rounded to 2 decimals
    pub turnaround_hours: f64,
}

/// Derive a TurnaroundRecord for every raw record that has a close timestamp.
/// Records without one are still open and silently dropped.
pub fn compute(raw: Vec<RawPullRequest>) -> Vec<TurnaroundRecord> {
    let total = raw.len();
    let records: Vec<TurnaroundRecord> = raw
        .into_iter()
        .filter_map(|pr| {
            let closed_at = pr.closed_at?;
            let seconds = (closed_at - pr.created_at).num_seconds() as f64;
            let hours = round2(seconds / 3600.0);
            Some(TurnaroundRecord {
                number: pr.number,
                title: pr.title,
                author: pr.user.login,
                created_at: pr.created_at,
                closed_at,
                merged: pr.merged_at.is_some(),
                labels: pr.labels.into_iter().map(|label| label.name).collect(),
                turnaround_hours: hours,
            })
        })
        .collect();
    debug!(input = total, closed = records.len(), "computed turnaround records");
    records
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
