//! Typed wire payloads for the GitHub endpoints the crawler consumes.
//!
//! The upstream API is loosely specified, so every field is optional and
//! presence checks happen at the use site instead of failing whole-document
//! deserialization.

use serde::{Deserialize, Deserializer};

/// Response document from `GET /search/repositories`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching repositories, stars-descending. A missing list terminates
    /// pagination the same way an empty one does.
    #[serde(default)]
    pub items: Option<Vec<SearchItem>>,
}

/// One entry in a search result page. Only the composite identifier is
/// consumed; full metadata comes from the per-repository endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    /// `owner/name` composite.
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Response document from `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoMetadata {
    /// Numeric repository id. Mandatory for mapping; deserialized leniently
    /// so a non-numeric value surfaces as `None` rather than failing the
    /// whole document.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerPayload>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<i32>,
    /// ISO-8601 timestamps, parsed by the mapper so one malformed value does
    /// not abort the mapping.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Nested owner object inside repository metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerPayload {
    #[serde(default)]
    pub login: Option<String>,
}

/// Response document from `GET /repos/{owner}/{name}/readme`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadmeResponse {
    /// Encoded README body. Absent for link-file READMEs.
    #[serde(default)]
    pub content: Option<String>,
    /// Encoding tag, `"base64"` expected.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Blob hash of the README content.
    #[serde(default)]
    pub sha: Option<String>,
    /// Direct raw-content URL, used as the decode fallback of last resort.
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Accept a numeric id, mapping any other JSON shape to `None`.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_metadata_lenient_id_numeric() {
        let meta: RepoMetadata = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(meta.id, Some(42));
    }

    #[test]
    fn test_repo_metadata_lenient_id_non_numeric() {
        let meta: RepoMetadata = serde_json::from_str(r#"{"id": "oops"}"#).unwrap();
        assert_eq!(meta.id, None);
    }

    #[test]
    fn test_repo_metadata_missing_fields_default_to_none() {
        let meta: RepoMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.id, None);
        assert_eq!(meta.full_name, None);
        assert!(meta.owner.is_none());
    }

    #[test]
    fn test_search_response_missing_items() {
        let resp: SearchResponse = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(resp.items.is_none());
    }

    #[test]
    fn test_readme_response_fields() {
        let readme: ReadmeResponse = serde_json::from_str(
            r#"{"content": "aGk=", "encoding": "base64", "sha": "abc", "download_url": "https://raw.example/readme"}"#,
        )
        .unwrap();
        assert_eq!(readme.content.as_deref(), Some("aGk="));
        assert_eq!(readme.encoding.as_deref(), Some("base64"));
        assert_eq!(readme.sha.as_deref(), Some("abc"));
    }
}
