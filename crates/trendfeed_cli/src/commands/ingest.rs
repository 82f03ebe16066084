//! `ingest` command: manually upsert a single repository.
//!
//! Unlike the scheduled path, errors here are reported to the caller
//! instead of being swallowed.

use super::shared::build_crawler;
use crate::config::Config;

pub(crate) async fn handle_ingest(
    full_name: &str,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let crawler = build_crawler(config, database_url).await?;

    crawler.upsert_repository(full_name).await?;
    println!("ingested: {full_name}");
    Ok(())
}
