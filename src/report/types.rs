/// Descriptive statistics over the merged subset of one repository's PRs.
/// Ephemeral: printed, never persisted.
#[derive(Debug)]
pub struct AggregateSummary {
    /// Number of merged PRs
    pub merged_count: usize,
    /// Mean turnaround in hours; NaN when no PRs were merged
    pub mean_hours: f64,
    /// Median turnaround in hours; NaN when no PRs were merged
    pub median_hours: f64,
    /// Fastest turnaround in hours; NaN when no PRs were merged
    pub min_hours: f64,
    /// Slowest turnaround in hours; NaN when no PRs were merged
    pub max_hours: f64,
    /// Per-author breakdown, sorted by descending PR count,
    /// ties in first-seen order
    pub by_author: Vec<AuthorStats>,
}

#[derive(Debug)]
pub struct AuthorStats {
    pub author: String,
    pub count: usize,
    pub mean_hours: f64,
    /// Sample standard deviation; NaN when the author has a single PR
    pub std_dev_hours: f64,
}
