//! Result type for ETag-conditional fetching.
//!
//! When a request carries an `If-None-Match` header with a previously stored
//! ETag, the server may answer `304 Not Modified` instead of resending the
//! body. READMEs are large relative to metadata and rarely change, so this is
//! the steady-state outcome for most crawls.

/// Result of a conditional GET request using ETag caching.
#[derive(Debug, Clone)]
pub enum FetchResult<T> {
    /// Server returned 304 Not Modified — cached data is still valid.
    NotModified,
    /// Server answered with a status other than 200/304 — treated as
    /// "nothing usable" by callers, never as an error.
    Unavailable,
    /// Server returned new data with an optional ETag for future caching.
    Fetched {
        /// The fetched data.
        data: T,
        /// ETag for caching (if provided by server).
        etag: Option<String>,
    },
}

impl<T> FetchResult<T> {
    /// Returns true if the result indicates not modified (cache hit).
    #[inline]
    pub fn is_not_modified(&self) -> bool {
        matches!(self, FetchResult::NotModified)
    }

    /// Extract data if fetched, returning None otherwise.
    pub fn into_data(self) -> Option<T> {
        match self {
            FetchResult::Fetched { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Get ETag if fetched, None otherwise.
    pub fn etag(&self) -> Option<&str> {
        match self {
            FetchResult::Fetched { etag, .. } => etag.as_deref(),
            _ => None,
        }
    }
}
