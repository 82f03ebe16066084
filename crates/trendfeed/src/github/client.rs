//! GitHub API client construction and request helpers.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, IF_NONE_MATCH, USER_AGENT};

use super::conditional::FetchResult;
use super::error::GitHubError;
use super::types::{ReadmeResponse, RepoMetadata, SearchResponse};

const GITHUB_JSON: &str = "application/vnd.github+json";
const GITHUB_RAW: &str = "application/vnd.github.raw";

/// Extract ETag from response headers.
///
/// Returns the ETag value if present, handling both strong and weak ETags.
pub fn extract_etag(headers: &HeaderMap) -> Option<String> {
    headers
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Connection settings for the GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// API base URL, e.g. `https://api.github.com`.
    pub base_url: String,
    /// Bearer token for the Authorization header.
    pub token: String,
    /// Per-call response timeout.
    pub timeout: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the three GitHub endpoints the crawler consumes.
///
/// All requests carry `Authorization`, `Accept: application/vnd.github+json`
/// and a fixed `User-Agent`. README fetches add `If-None-Match` when a
/// cached ETag is supplied.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Build a client from connection settings.
    pub fn new(config: GitHubClientConfig) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GitHubError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        headers.insert(USER_AGENT, HeaderValue::from_static("trendfeed-crawler"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(GitHubError::Build)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search repositories: `GET /search/repositories`.
    ///
    /// Returns `Ok(None)` when the response is not a usable search document
    /// (non-2xx status or unparseable body) — the paginator treats that as a
    /// termination condition, not an error. Transport failures propagate.
    pub async fn search_repositories(
        &self,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Option<SearchResponse>, GitHubError> {
        let url = format!("{}/search/repositories", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", &per_page.to_string()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), page, "search returned non-success status");
            return Ok(None);
        }

        Ok(response.json::<SearchResponse>().await.ok())
    }

    /// Fetch single-repository metadata: `GET /repos/{owner}/{name}`.
    ///
    /// Returns `Ok(None)` for non-2xx responses and unparseable bodies; the
    /// upserter treats missing upstream data as an idempotent no-op.
    pub async fn get_repo(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepoMetadata>, GitHubError> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, name);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), owner, name, "metadata fetch returned non-success status");
            return Ok(None);
        }

        Ok(response.json::<RepoMetadata>().await.ok())
    }

    /// Conditionally fetch the README document:
    /// `GET /repos/{owner}/{name}/readme` with `If-None-Match` when a cached
    /// ETag is present.
    pub async fn get_readme(
        &self,
        owner: &str,
        name: &str,
        cached_etag: Option<&str>,
    ) -> Result<FetchResult<ReadmeResponse>, GitHubError> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, owner, name);
        let mut request = self.http.get(&url);
        if let Some(etag) = cached_etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::NOT_MODIFIED => Ok(FetchResult::NotModified),
            _ if status.is_success() => {
                let etag = extract_etag(response.headers());
                match response.json::<ReadmeResponse>().await {
                    Ok(data) => Ok(FetchResult::Fetched { data, etag }),
                    Err(e) => {
                        tracing::debug!(owner, name, "README body parse failed: {e}");
                        Ok(FetchResult::Unavailable)
                    }
                }
            }
            _ => {
                tracing::debug!(status = %status, owner, name, "README fetch returned non-success status");
                Ok(FetchResult::Unavailable)
            }
        }
    }

    /// Fetch raw text from a README `download_url`.
    ///
    /// Used as the last step of the decode fallback chain. Returns `None`
    /// for any non-2xx response.
    pub async fn download_raw(&self, url: &str) -> Result<Option<String>, GitHubError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(GITHUB_RAW))
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        Ok(response.text().await.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_etag_strong_and_weak() {
        let mut headers = HeaderMap::new();
        headers.insert("etag", HeaderValue::from_static("\"abc123\""));
        assert_eq!(extract_etag(&headers), Some("\"abc123\"".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert("etag", HeaderValue::from_static("W/\"abc123\""));
        assert_eq!(extract_etag(&headers), Some("W/\"abc123\"".to_string()));
    }

    #[test]
    fn test_extract_etag_absent() {
        let headers = HeaderMap::new();
        assert_eq!(extract_etag(&headers), None);
    }

    #[test]
    fn test_client_strips_trailing_slash_from_base_url() {
        let client = GitHubClient::new(GitHubClientConfig {
            base_url: "https://api.github.com/".to_string(),
            token: "token".to_string(),
            timeout: Duration::from_secs(5),
        })
        .expect("client should build");
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_client_rejects_unprintable_token() {
        let err = GitHubClient::new(GitHubClientConfig {
            token: "bad\ntoken".to_string(),
            ..Default::default()
        })
        .expect_err("newline in token should fail header construction");
        assert!(matches!(err, GitHubError::InvalidToken));
    }
}
