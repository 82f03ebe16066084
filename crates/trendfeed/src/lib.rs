//! Trendfeed - a GitHub popular-repository crawler.
//!
//! This library discovers highly starred repositories through the search
//! API, upserts per-repository metadata, and attaches README content
//! fetched with ETag-conditional requests so unchanged READMEs are never
//! re-downloaded or re-decoded.
//!
//! # Example
//!
//! ```ignore
//! use trendfeed::{Crawler, connect_and_migrate};
//! use trendfeed::github::{GitHubClient, GitHubClientConfig};
//!
//! let db = connect_and_migrate("sqlite://trendfeed.db?mode=rwc").await?;
//! let github = GitHubClient::new(GitHubClientConfig {
//!     token: token.clone(),
//!     ..Default::default()
//! })?;
//!
//! let crawler = Crawler::new(github, db);
//! crawler.run("stars:>5000", &["rust".to_string()], 50, 3).await?;
//! ```

pub mod crawl;
pub mod db;
pub mod entity;
pub mod github;
pub mod migration;
pub mod repository;

pub use crawl::{Crawler, CrawlError};
pub use db::{connect, connect_and_migrate};
pub use entity::prelude::*;
pub use repository::RepositoryError;
