//! GitHub API client for the crawl engine.
//!
//! Exactly three endpoints are covered: repository search, single-repository
//! metadata, and the repository README (plus the raw download fallback the
//! README decoder uses). This is deliberately not a general GitHub client.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Typed wire payloads, one per endpoint
//! - [`client`] - Client construction and request helpers
//! - [`conditional`] - Result type for ETag-conditional fetches
//! - [`readme`] - Base64 decoding fallback chain for README content

mod client;
mod conditional;
mod error;
pub mod readme;
mod types;

pub use client::{GitHubClient, GitHubClientConfig, extract_etag};
pub use conditional::FetchResult;
pub use error::GitHubError;
pub use types::{OwnerPayload, ReadmeResponse, RepoMetadata, SearchItem, SearchResponse};
