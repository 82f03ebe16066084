//! Crawl engine error types.

use thiserror::Error;

use crate::github::GitHubError;
use crate::repository::RepositoryError;

/// Errors that can abort a single repository upsert.
///
/// The discovery loop swallows all of these at its per-item boundary; only
/// the manual ingest path reports them to a caller.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The composite identifier is not `owner/name` with both parts
    /// non-empty.
    #[error("Invalid repository identifier: {input:?}")]
    InvalidIdentifier { input: String },

    /// The metadata payload is missing its mandatory numeric id.
    #[error("Malformed metadata for {full_name}: missing numeric id")]
    MalformedMetadata { full_name: String },

    /// Transport-level GitHub API failure.
    #[error(transparent)]
    Github(#[from] GitHubError),

    /// Storage failure.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_display() {
        let err = CrawlError::InvalidIdentifier {
            input: "no-separator".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid repository identifier"));
        assert!(msg.contains("no-separator"));
    }

    #[test]
    fn test_malformed_metadata_display() {
        let err = CrawlError::MalformedMetadata {
            full_name: "acme/widget".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("acme/widget"));
        assert!(msg.contains("missing numeric id"));
    }
}
