mod chart;
mod config;
mod export;
mod pr;
mod report;
mod turnaround;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, info_span, warn};
use tracing_subscriber::EnvFilter;

/// PR Turnaround — CLI tool that fetches closed pull requests from the GitHub
/// API for each configured repository, computes per-PR turnaround time, and
/// writes a summary, a CSV table, and a chart.
#[derive(Parser, Debug)]
#[command(name = "pr-turnaround", version, about)]
struct Cli {
    /// Total number of PRs to fetch per repository
    #[arg(long, default_value_t = 500)]
    limit: usize,

    /// Path to the YAML config file listing repositories
    #[arg(long, default_value = "repos.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(config = %cli.config.display(), "loading configuration");
    let config = config::Config::load(&cli.config)?;
    if config.repos.is_empty() {
        warn!("no repositories configured, nothing to do");
        return Ok(());
    }

    let token = config::github_token();
    if token.is_none() {
        warn!("GITHUB_TOKEN not set, requests are unauthenticated");
    }

    let client = reqwest::Client::new();
    let colors = chart::LabelColorTable::default();
    let opts = pr::FetchOptions {
        limit: cli.limit,
        ..pr::FetchOptions::default()
    };

    // Repositories are processed one after another; a failure in one repo is
    // logged and the loop moves on to the next.
    for repo in &config.repos {
        let _span = info_span!("repo", name = %repo.name).entered();

        info!(limit = cli.limit, url = %repo.url, "fetching pull requests");
        let outcome =
            pr::fetch_pull_requests(&client, &repo.url, token.as_deref(), &opts).await;
        if let Some(err) = &outcome.error {
            error!(error = %err, "fetch stopped early, using pages retrieved so far");
        }
        info!(retrieved = outcome.records.len(), "retrieved pull requests");

        let records = turnaround::compute(outcome.records);

        let summary = report::summarize(&records);
        report::print_summary(&summary, &repo.name);

        let csv_path = PathBuf::from(format!("{}_pr_turnaround.csv", repo.name));
        match export::write_csv(&records, &csv_path) {
            Ok(()) => info!(path = %csv_path.display(), "saved CSV"),
            Err(err) => error!(error = %err, "failed to write CSV"),
        }

        let chart_path = PathBuf::from(format!("{}_pr_turnaround.png", repo.name));
        match chart::render(&records, &repo.name, &chart_path, &colors, true) {
            Ok(()) => info!(path = %chart_path.display(), "saved chart"),
            Err(err) => error!(error = %err, "failed to render chart"),
        }
    }

    Ok(())
}
