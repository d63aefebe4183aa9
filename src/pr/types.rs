use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A pull request as returned by the GitHub REST `/pulls` endpoint.
///
/// Only the fields the pipeline consumes are modeled; serde ignores the rest
/// of the response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPullRequest {
    /// PR number, unique within a repository
    pub number: u64,
    /// PR title
    pub title: String,
    /// Author. The API can omit this for deleted accounts; that case is not
    /// guarded and fails deserialization of the whole page.
    pub user: User,
    /// Creation timestamp, always present
    pub created_at: DateTime<Utc>,
    /// Close timestamp; `None` while the PR is still open
    pub closed_at: Option<DateTime<Utc>>,
    /// Merge timestamp; `None` for PRs closed without merging
    pub merged_at: Option<DateTime<Utc>>,
    /// Labels in API order, possibly absent from the payload
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}
