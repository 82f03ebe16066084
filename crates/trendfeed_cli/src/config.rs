//! Configuration file support for trendfeed.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `TRENDFEED_`, e.g., `TRENDFEED_GITHUB_TOKEN`)
//! 3. Config file (~/.config/trendfeed/config.toml or ./trendfeed.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/trendfeed/trendfeed.db"  # optional
//!
//! [github]
//! base_url = "https://api.github.com"  # optional, this is the default
//! token = "ghp_..."  # or use TRENDFEED_GITHUB_TOKEN env var
//!
//! [crawler]
//! query = "stars:>5000"
//! languages = "java,kotlin,typescript"  # comma-separated, optional
//! per_page = 50
//! max_pages = 3
//! cron = "0 0 */3 * * *"  # every 3 hours
//! pace_ms = 120
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// GitHub API configuration.
    pub github: GitHubConfig,
    /// Crawler parameters.
    pub crawler: CrawlerConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    /// Defaults to `sqlite://~/.local/state/trendfeed/trendfeed.db` if not specified.
    pub url: Option<String>,
}

/// GitHub API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL. Override for GitHub Enterprise or tests.
    pub base_url: String,
    /// GitHub API token.
    /// Can also be set via TRENDFEED_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

/// Crawler parameters, all with defaults matching the scheduled crawl.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Base search query.
    pub query: String,
    /// Comma-separated language filters, e.g. "java,kotlin,typescript".
    pub languages: String,
    /// Search page size.
    pub per_page: u32,
    /// Maximum number of search pages per run.
    pub max_pages: u32,
    /// Cron expression for scheduled runs.
    pub cron: String,
    /// Pause between successive item upserts, in milliseconds.
    pub pace_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            query: "stars:>5000".to_string(),
            languages: String::new(),
            per_page: 50,
            max_pages: 3,
            cron: "0 0 */3 * * *".to_string(),
            pace_ms: 120,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/trendfeed/config.toml)
    /// 3. Local config file (./trendfeed.toml)
    /// 4. Environment variables with TRENDFEED_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "trendfeed") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Local config file (higher priority than XDG)
        let local_config = PathBuf::from("trendfeed.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./trendfeed.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // TRENDFEED_ prefixed environment variables
        // e.g., TRENDFEED_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("TRENDFEED")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter enables read-write access and creates the
    /// file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("trendfeed.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Language filters as a list, split on commas.
    ///
    /// Blank entries survive here; the query builder skips them.
    pub fn languages(&self) -> Vec<String> {
        if self.crawler.languages.trim().is_empty() {
            return Vec::new();
        }
        self.crawler
            .languages
            .split(',')
            .map(|s| s.to_string())
            .collect()
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/trendfeed` or `~/.local/state/trendfeed`.
    fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "trendfeed").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_defaults_match_scheduled_crawl() {
        let config = CrawlerConfig::default();
        assert_eq!(config.query, "stars:>5000");
        assert_eq!(config.per_page, 50);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.cron, "0 0 */3 * * *");
        assert_eq!(config.pace_ms, 120);
    }

    #[test]
    fn test_languages_split() {
        let mut config = Config::default();
        config.crawler.languages = "java, kotlin,typescript".to_string();
        assert_eq!(config.languages(), vec!["java", " kotlin", "typescript"]);

        config.crawler.languages = String::new();
        assert!(config.languages().is_empty());
    }

    #[test]
    fn test_database_url_prefers_configured_value() {
        let mut config = Config::default();
        config.database.url = Some("postgres:///trendfeed_dev".to_string());
        assert_eq!(
            config.database_url().as_deref(),
            Some("postgres:///trendfeed_dev")
        );
    }
}
