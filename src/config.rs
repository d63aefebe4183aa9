use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Repository list loaded from repos.yaml.
///
/// A file without a `repos` key yields an empty list: nothing is processed
/// and that is not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
}

/// One repository to analyze: a display name (used for output filenames)
/// and the API base URL, e.g. `https://api.github.com/repos/org/repo`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    pub name: String,
    pub url: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

/// Resolve the GitHub token from the environment, read once at startup.
/// `None` means requests go out unauthenticated, subject to the stricter
/// public rate limits.
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}
