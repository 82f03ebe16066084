//! Mapping from GitHub metadata payloads onto repository records.

use chrono::DateTime;
use sea_orm::entity::prelude::DateTimeWithTimeZone;

use super::error::CrawlError;
use crate::entity::git_repository::Model;
use crate::github::RepoMetadata;

/// Map a metadata payload onto a repository record.
///
/// When `existing` is present the payload is merged onto it in place: every
/// metadata-managed field is overwritten unconditionally, while the README
/// fields (`readme_text`, `readme_sha`, `readme_etag`) and `last_crawled_at`
/// pass through untouched. Fails only when the mandatory numeric id is
/// absent from the payload.
pub fn map_metadata(meta: &RepoMetadata, existing: Option<Model>) -> Result<Model, CrawlError> {
    let id = meta.id.ok_or_else(|| CrawlError::MalformedMetadata {
        full_name: meta.full_name.clone().unwrap_or_default(),
    })?;

    let mut record = existing.unwrap_or_else(|| Model::empty(id));
    record.id = id;
    record.node_id = meta.node_id.clone();
    record.name = meta.name.clone();
    record.full_name = meta.full_name.clone();
    record.owner_login = meta.owner.as_ref().and_then(|o| o.login.clone());
    record.html_url = meta.html_url.clone();
    record.description = meta.description.clone();
    record.language = meta.language.clone();
    record.stargazers_count = meta.stargazers_count;
    record.created_at = parse_timestamp(meta.created_at.as_deref());
    record.pushed_at = parse_timestamp(meta.pushed_at.as_deref());
    record.updated_at = parse_timestamp(meta.updated_at.as_deref());

    Ok(record)
}

/// Parse an ISO-8601 timestamp from the wire.
///
/// A malformed value is logged and mapped to `None` rather than aborting the
/// mapping; the other metadata fields are independently useful.
pub fn parse_timestamp(iso: Option<&str>) -> Option<DateTimeWithTimeZone> {
    let raw = iso?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt),
        Err(e) => {
            tracing::warn!(raw, "ignoring malformed timestamp: {e}");
            None
        }
    }
}
