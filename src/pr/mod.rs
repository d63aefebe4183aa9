pub mod types;

pub use types::RawPullRequest;

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Fixed pause between successive page fetches, to stay under rate limits.
const PAGE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for page {page}: {body}")]
    BadStatus {
        status: reqwest::StatusCode,
        page: u32,
        body: String,
    },
}

/// Knobs for a paginated `/pulls` fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// PR state filter: "open", "closed", or "all"
    pub state: String,
    /// Records per page (GitHub caps this at 100)
    pub per_page: usize,
    /// Total records to accumulate across pages
    pub limit: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            state: "closed".to_string(),
            per_page: 100,
            limit: 500,
        }
    }
}

/// What a fetch run produced. Pagination stops on the first bad response, but
/// pages fetched before it are kept and flow through the rest of the pipeline.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<RawPullRequest>,
    pub error: Option<FetchError>,
}

/// Number of pages needed to reach `limit` at `per_page` records each.
pub fn max_pages(limit: usize, per_page: usize) -> u32 {
    (limit.div_ceil(per_page)) as u32
}

/// Fold one page into the accumulator, truncating to `limit`. Returns true
/// when pagination should stop: the page came back empty or the accumulator
/// is full. The accumulator never exceeds `limit`.
fn absorb_page(records: &mut Vec<RawPullRequest>, page: Vec<RawPullRequest>, limit: usize) -> bool {
    if page.is_empty() {
        return true;
    }
    records.extend(page);
    records.truncate(limit);
    records.len() >= limit
}

/// Page through `{api_url}/pulls` until the limit is reached, a page comes
/// back empty, or the API returns a non-success status. No retries; a fixed
/// delay separates successful pages. The result is truncated to `limit` and
/// keeps API page order, which is not sorted by PR number.
#[instrument(skip(client, token, opts), fields(limit = opts.limit, state = %opts.state))]
pub async fn fetch_pull_requests(
    client: &reqwest::Client,
    api_url: &str,
    token: Option<&str>,
    opts: &FetchOptions,
) -> FetchOutcome {
    let mut records: Vec<RawPullRequest> = Vec::new();
    let url = format!("{}/pulls", api_url.trim_end_matches('/'));

    for page in 1..=max_pages(opts.limit, opts.per_page) {
        debug!(page, accumulated = records.len(), "requesting page");
        let mut request = client
            .get(&url)
            .header("User-Agent", "pr-turnaround")
            .query(&[
                ("state", opts.state.as_str()),
                ("per_page", &opts.per_page.to_string()),
                ("page", &page.to_string()),
            ]);
        if let Some(token) = token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(page, error = %err, "request failed, stopping pagination");
                return FetchOutcome {
                    records,
                    error: Some(FetchError::Request(err)),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(page, %status, "non-success status, stopping pagination");
            return FetchOutcome {
                records,
                error: Some(FetchError::BadStatus { status, page, body }),
            };
        }

        let page_records: Vec<RawPullRequest> = match response.json().await {
            Ok(page_records) => page_records,
            Err(err) => {
                warn!(page, error = %err, "failed to decode page, stopping pagination");
                return FetchOutcome {
                    records,
                    error: Some(FetchError::Request(err)),
                };
            }
        };

        let page_len = page_records.len();
        if absorb_page(&mut records, page_records, opts.limit) {
            debug!(page, page_len, accumulated = records.len(), "stopping pagination");
            break;
        }

        tokio::time::sleep(PAGE_DELAY).await;
    }

    FetchOutcome {
        records,
        error: None,
    }
}
