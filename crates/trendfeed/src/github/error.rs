//! GitHub API error types.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured bearer token contains bytes that cannot form a header.
    #[error("Invalid authorization token")]
    InvalidToken,

    /// The client itself could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_display() {
        let err = GitHubError::InvalidToken;
        assert!(err.to_string().contains("token"));
    }
}
