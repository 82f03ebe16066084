//! Helpers shared across CLI commands.

use std::time::Duration;

use trendfeed::Crawler;
use trendfeed::db;
use trendfeed::github::{GitHubClient, GitHubClientConfig};

use crate::config::Config;

/// Build a crawl engine from the loaded configuration.
///
/// Connects to the database (running migrations) and constructs the GitHub
/// client with the configured base URL, token, and pacing.
pub(crate) async fn build_crawler(
    config: &Config,
    database_url: &str,
) -> Result<Crawler, Box<dyn std::error::Error>> {
    let token = config.github.token.clone().unwrap_or_else(|| {
        tracing::warn!("no GitHub token configured; unauthenticated requests are heavily limited");
        String::new()
    });

    let github = GitHubClient::new(GitHubClientConfig {
        base_url: config.github.base_url.clone(),
        token,
        ..Default::default()
    })?;

    let db = db::connect_and_migrate(database_url).await?;

    Ok(Crawler::new(github, db).with_pacing(Duration::from_millis(config.crawler.pace_ms)))
}
