//! GitRepository entity - one row per distinct GitHub repository id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// GitRepository model - a crawled snapshot of one GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "git_repositories")]
pub struct Model {
    /// GitHub's numeric repository id. Stable across renames, so it is the
    /// primary key; `full_name` is never used as an upsert key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    // ─── Identity ────────────────────────────────────────────────────────────
    /// GitHub GraphQL node id.
    pub node_id: Option<String>,
    /// Repository name (URL-safe slug).
    pub name: Option<String>,
    /// `owner/name` composite.
    pub full_name: Option<String>,
    /// Owner login (user or organization).
    pub owner_login: Option<String>,
    /// Web URL of the repository.
    #[sea_orm(column_type = "Text", nullable)]
    pub html_url: Option<String>,

    // ─── Content ─────────────────────────────────────────────────────────────
    /// Repository description.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Primary programming language.
    pub language: Option<String>,
    /// Star count.
    pub stargazers_count: Option<i32>,

    // ─── Upstream timestamps ─────────────────────────────────────────────────
    /// When the repository was created on GitHub.
    pub created_at: Option<DateTimeWithTimeZone>,
    /// When code was last pushed.
    pub pushed_at: Option<DateTimeWithTimeZone>,
    /// When the repository was last updated.
    pub updated_at: Option<DateTimeWithTimeZone>,

    // ─── README ──────────────────────────────────────────────────────────────
    /// Decoded README text, if any.
    #[sea_orm(column_type = "Text", nullable)]
    pub readme_text: Option<String>,
    /// Content hash of the README blob, updated together with the ETag.
    pub readme_sha: Option<String>,
    /// ETag from the last successful README fetch, sent back as
    /// If-None-Match on the next crawl.
    #[sea_orm(column_type = "Text", nullable)]
    pub readme_etag: Option<String>,

    // ─── Tracking ────────────────────────────────────────────────────────────
    /// Local time of the last completed upsert.
    pub last_crawled_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Empty record for a freshly discovered repository id.
    pub fn empty(id: i64) -> Self {
        Self {
            id,
            node_id: None,
            name: None,
            full_name: None,
            owner_login: None,
            html_url: None,
            description: None,
            language: None,
            stargazers_count: None,
            created_at: None,
            pushed_at: None,
            updated_at: None,
            readme_text: None,
            readme_sha: None,
            readme_etag: None,
            last_crawled_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_only_id() {
        let model = Model::empty(42);
        assert_eq!(model.id, 42);
        assert_eq!(model.full_name, None);
        assert_eq!(model.readme_etag, None);
        assert_eq!(model.last_crawled_at, None);
    }
}
