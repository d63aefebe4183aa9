pub mod types;

pub use types::{AggregateSummary, AuthorStats};

use colored::Colorize;
use indexmap::IndexMap;
use tracing::debug;

use crate::turnaround::TurnaroundRecord;

/// Build the aggregate summary over the merged subset of `records`.
///
/// Every statistic is over merged PRs only; an empty merged subset yields NaN
/// for mean/median/min/max, which is deliberately distinct from zero.
pub fn summarize(records: &[TurnaroundRecord]) -> AggregateSummary {
    let merged: Vec<&TurnaroundRecord> = records.iter().filter(|r| r.merged).collect();
    let hours: Vec<f64> = merged.iter().map(|r| r.turnaround_hours).collect();

    let mut groups: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for record in &merged {
        groups
            .entry(record.author.as_str())
            .or_default()
            .push(record.turnaround_hours);
    }

    let mut by_author: Vec<AuthorStats> = groups
        .into_iter()
        .map(|(author, hours)| AuthorStats {
            author: author.to_string(),
            count: hours.len(),
            mean_hours: mean(&hours),
            std_dev_hours: sample_std_dev(&hours),
        })
        .collect();
    // Stable sort, so equal counts keep first-seen order
    by_author.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(merged = merged.len(), authors = by_author.len(), "built summary");
    AggregateSummary {
        merged_count: merged.len(),
        mean_hours: mean(&hours),
        median_hours: median(&hours),
        min_hours: hours.iter().copied().fold(f64::NAN, f64::min),
        max_hours: hours.iter().copied().fold(f64::NAN, f64::max),
        by_author,
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; average of the two middle values for even lengths, NaN when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 degrees of freedom). NaN for fewer than
/// two values, matching the statistics convention rather than substituting 0.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (n - 1.0)).sqrt()
}

/// Print the per-repository summary to stdout.
pub fn print_summary(summary: &AggregateSummary, repo_name: &str) {
    println!();
    println!("═══ {} ═══", format!("Summary for {repo_name}").bold());
    println!("Total merged PRs: {}", summary.merged_count);
    println!("Average turnaround: {:.2} hours", summary.mean_hours);
    println!("Median turnaround:  {:.2} hours", summary.median_hours);
    println!("Fastest turnaround: {:.2} hours", summary.min_hours);
    println!("Slowest turnaround: {:.2} hours", summary.max_hours);

    println!();
    println!("{}", "Contributor summary:".bold());
    println!("{:<24} {:>6} {:>12} {:>12}", "author", "count", "mean", "std");
    for stats in &summary.by_author {
        println!(
            "{:<24} {:>6} {:>12.2} {:>12.2}",
            stats.author.cyan(),
            stats.count,
            stats.mean_hours,
            stats.std_dev_hours
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(number: u64, author: &str, merged: bool, hours: f64) -> TurnaroundRecord {
        let created: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        TurnaroundRecord {
            number,
            title: format!("PR {number}"),
            author: author.to_string(),
            created_at: created,
            closed_at: created + chrono::Duration::hours(hours as i64),
            merged,
            labels: vec![],
            turnaround_hours: hours,
        }
    }

    #[test]
    fn test_mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[1.0, 3.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_sample_std_dev() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] with n-1 is 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_std_dev_is_nan() {
        assert!(sample_std_dev(&[5.0]).is_nan());
        assert!(sample_std_dev(&[]).is_nan());
    }

    #[test]
    fn test_summary_over_merged_subset_only() {
        let records = vec![
            record(1, "alice", true, 10.0),
            record(2, "alice", true, 20.0),
            record(3, "bob", false, 100.0),
            record(4, "bob", true, 30.0),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.merged_count, 3);
        assert_eq!(summary.mean_hours, 20.0);
        assert_eq!(summary.median_hours, 20.0);
        assert_eq!(summary.min_hours, 10.0);
        assert_eq!(summary.max_hours, 30.0);
    }

    #[test]
    fn test_empty_merged_subset_is_nan_not_zero() {
        let records = vec![record(1, "alice", false, 10.0)];
        let summary = summarize(&records);
        assert_eq!(summary.merged_count, 0);
        assert!(summary.mean_hours.is_nan());
        assert!(summary.median_hours.is_nan());
        assert!(summary.min_hours.is_nan());
        assert!(summary.max_hours.is_nan());
        assert!(summary.by_author.is_empty());
    }

    #[test]
    fn test_author_sort_descending_ties_first_seen() {
        let records = vec![
            record(1, "carol", true, 1.0),
            record(2, "alice", true, 2.0),
            record(3, "bob", true, 3.0),
            record(4, "bob", true, 4.0),
            record(5, "alice", true, 5.0),
        ];
        let summary = summarize(&records);
        let order: Vec<&str> = summary.by_author.iter().map(|a| a.author.as_str()).collect();
        // alice and bob tie at 2; alice was seen first
        assert_eq!(order, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_author_single_pr_std_is_nan() {
        let records = vec![record(1, "alice", true, 12.0)];
        let summary = summarize(&records);
        assert_eq!(summary.by_author[0].count, 1);
        assert!(summary.by_author[0].std_dev_hours.is_nan());
    }
}
