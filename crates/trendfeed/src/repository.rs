//! Storage operations for GitRepository records.
//!
//! The crawl engine only needs two operations: find a record by GitHub's
//! numeric id and upsert a full record keyed by that id. A secondary lookup
//! by `full_name` is provided for the manual ingest path.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use thiserror::Error;

use crate::entity::git_repository::{ActiveModel, Column, Entity as GitRepository, Model};

/// Errors that can occur during repository storage operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Repository not found.
    #[error("Repository not found: {context}")]
    NotFound { context: String },
}

impl RepositoryError {
    /// Create a NotFound error for an id lookup.
    pub fn not_found_by_id(id: i64) -> Self {
        Self::NotFound {
            context: format!("id={}", id),
        }
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Find a repository by GitHub's numeric id.
pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>> {
    GitRepository::find_by_id(id)
        .one(db)
        .await
        .map_err(RepositoryError::from)
}

/// Find a repository by its `owner/name` composite.
///
/// Names can be renamed upstream, so this is a convenience lookup only and
/// never an upsert key.
pub async fn find_by_full_name(db: &DatabaseConnection, full_name: &str) -> Result<Option<Model>> {
    GitRepository::find()
        .filter(Column::FullName.eq(full_name))
        .one(db)
        .await
        .map_err(RepositoryError::from)
}

/// Insert or update a full repository record keyed by its id.
///
/// If a record with the same id exists it is updated in place; otherwise a
/// new record is inserted. Every column is written from `model`.
pub async fn upsert(db: &DatabaseConnection, model: Model) -> Result<Model> {
    let exists = find_by_id(db, model.id).await?.is_some();

    // Force every column into the write set; `into_active_model` marks
    // fields as Unchanged when converting from a loaded Model.
    let active: ActiveModel = model.into_active_model().reset_all();

    if exists {
        active.update(db).await.map_err(RepositoryError::from)
    } else {
        active.insert(db).await.map_err(RepositoryError::from)
    }
}

/// Count all stored repositories.
pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    use sea_orm::PaginatorTrait;

    GitRepository::find()
        .count(db)
        .await
        .map_err(RepositoryError::from)
}

/// Stamp a record with an updated `last_crawled_at` without touching other
/// columns.
pub async fn touch_last_crawled(
    db: &DatabaseConnection,
    id: i64,
    at: chrono::DateTime<chrono::FixedOffset>,
) -> Result<()> {
    let found = find_by_id(db, id)
        .await?
        .ok_or_else(|| RepositoryError::not_found_by_id(id))?;

    let mut active = found.into_active_model();
    active.last_crawled_at = Set(Some(at));
    active.update(db).await?;
    Ok(())
}
