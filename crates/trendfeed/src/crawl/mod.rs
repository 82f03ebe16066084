//! The crawl engine: paginated discovery plus per-repository upsert.
//!
//! A scheduled run walks the search endpoint page by page, and for every
//! discovered `owner/name` runs the upsert pipeline: fetch metadata, merge
//! it onto any existing record, attach README content via an
//! ETag-conditional fetch, stamp the crawl time, and persist. Items are
//! processed strictly sequentially with a fixed pacing delay between them;
//! no single item's failure aborts the run.

mod error;
pub mod map;

pub use error::CrawlError;

use std::time::Duration;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::entity::git_repository::Model;
use crate::github::{FetchResult, GitHubClient, readme};
use crate::repository;

/// Default pause between successive item upserts within a page.
pub const DEFAULT_PACING: Duration = Duration::from_millis(120);

/// Build the effective search query by appending one `language:<x>` clause
/// per non-empty filter.
pub fn build_search_query(base: &str, languages: &[String]) -> String {
    let mut query = base.to_string();
    for lang in languages {
        let trimmed = lang.trim();
        if !trimmed.is_empty() {
            query.push_str("+language:");
            query.push_str(trimmed);
        }
    }
    query
}

/// Split an `owner/name` composite into its parts.
///
/// Requires exactly one separator with non-empty owner and name on either
/// side.
pub fn split_full_name(input: &str) -> Result<(&str, &str), CrawlError> {
    let invalid = || CrawlError::InvalidIdentifier {
        input: input.to_string(),
    };

    let (owner, name) = input.split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(invalid());
    }
    Ok((owner, name))
}

/// The crawl engine.
///
/// One logical worker per run: every HTTP call blocks the loop until it
/// completes, which bounds load on the API and keeps page/item ordering
/// deterministic.
#[derive(Clone)]
pub struct Crawler {
    github: GitHubClient,
    db: DatabaseConnection,
    pacing: Duration,
}

impl Crawler {
    /// Create a crawler with the default inter-item pacing.
    pub fn new(github: GitHubClient, db: DatabaseConnection) -> Self {
        Self {
            github,
            db,
            pacing: DEFAULT_PACING,
        }
    }

    /// Override the pause between successive item upserts.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run one discovery pass over the search endpoint.
    ///
    /// Iterates pages `1..=max_pages`, upserting every discovered
    /// repository. The loop ends early, without error, when a page yields no
    /// usable search document or an empty item list. Per-item failures are
    /// logged and skipped.
    #[tracing::instrument(skip(self, languages), fields(query = %query))]
    pub async fn run(
        &self,
        query: &str,
        languages: &[String],
        per_page: u32,
        max_pages: u32,
    ) -> Result<(), CrawlError> {
        let effective_query = build_search_query(query, languages);
        tracing::info!(query = %effective_query, per_page, max_pages, "starting discovery run");

        for page in 1..=max_pages {
            let Some(search) = self
                .github
                .search_repositories(&effective_query, per_page, page)
                .await?
            else {
                tracing::debug!(page, "no usable search response, ending run");
                break;
            };

            let items = search.items.unwrap_or_default();
            if items.is_empty() {
                tracing::debug!(page, "empty result page, ending run");
                break;
            }

            for item in items {
                match item.full_name.as_deref() {
                    Some(full_name) => {
                        if let Err(e) = self.upsert_repository(full_name).await {
                            tracing::warn!(full_name, "skipping repository after failed upsert: {e}");
                        }
                    }
                    None => tracing::warn!(page, "search item without full_name, skipping"),
                }
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(())
    }

    /// Upsert a single repository by its `owner/name` composite.
    ///
    /// Missing upstream metadata is an idempotent no-op. On success exactly
    /// one record keyed by GitHub's numeric id is created or updated, with
    /// `last_crawled_at` stamped after the metadata and README steps.
    #[tracing::instrument(skip(self), fields(full_name = %full_name))]
    pub async fn upsert_repository(&self, full_name: &str) -> Result<(), CrawlError> {
        let (owner, name) = split_full_name(full_name)?;

        let Some(meta) = self.github.get_repo(owner, name).await? else {
            tracing::debug!(full_name, "no metadata upstream, nothing to upsert");
            return Ok(());
        };

        let existing = match meta.id {
            Some(id) => repository::find_by_id(&self.db, id).await?,
            // Let the mapper produce the malformed-metadata error
            None => None,
        };

        let mut record = map::map_metadata(&meta, existing)?;
        self.fetch_and_attach_readme(owner, name, &mut record).await;
        record.last_crawled_at = Some(Utc::now().fixed_offset());

        repository::upsert(&self.db, record).await?;
        tracing::debug!(full_name, "upserted repository");
        Ok(())
    }

    /// Conditionally fetch the README and attach it to the record.
    ///
    /// 304, non-2xx and transport failures all leave the README fields
    /// untouched; the surrounding upsert still completes. A 2xx response
    /// always advances `readme_sha` and the stored ETag, even when decoding
    /// yields no text.
    async fn fetch_and_attach_readme(&self, owner: &str, name: &str, record: &mut Model) {
        let fetched = match self
            .github
            .get_readme(owner, name, record.readme_etag.as_deref())
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::debug!(owner, name, "README fetch failed: {e}");
                return;
            }
        };

        match fetched {
            FetchResult::NotModified => {
                tracing::debug!(owner, name, "README unchanged (304)");
            }
            FetchResult::Unavailable => {}
            FetchResult::Fetched { data, etag } => {
                record.readme_text = readme::decode(&self.github, &data).await;
                record.readme_sha = data.sha;
                record.readme_etag = etag;
            }
        }
    }
}
