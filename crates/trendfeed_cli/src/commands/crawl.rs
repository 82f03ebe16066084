//! `crawl` and `schedule` commands: one-shot and cron-driven discovery runs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};
use trendfeed::Crawler;

use super::shared::build_crawler;
use crate::CrawlArgs;
use crate::config::Config;

/// Effective discovery parameters after CLI flags override config values.
struct RunParams {
    query: String,
    languages: Vec<String>,
    per_page: u32,
    max_pages: u32,
}

fn resolve_params(args: &CrawlArgs, config: &Config) -> RunParams {
    RunParams {
        query: args
            .query
            .clone()
            .unwrap_or_else(|| config.crawler.query.clone()),
        languages: args
            .languages
            .clone()
            .map(|csv| csv.split(',').map(String::from).collect())
            .unwrap_or_else(|| config.languages()),
        per_page: args.per_page.unwrap_or(config.crawler.per_page),
        max_pages: args.max_pages.unwrap_or(config.crawler.max_pages),
    }
}

async fn run_once(crawler: &Crawler, params: &RunParams) {
    if let Err(e) = crawler
        .run(
            &params.query,
            &params.languages,
            params.per_page,
            params.max_pages,
        )
        .await
    {
        tracing::error!("discovery run failed: {e}");
    }
}

/// Run one discovery pass and exit.
pub(crate) async fn handle_crawl(
    args: CrawlArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let crawler = build_crawler(config, database_url).await?;
    let params = resolve_params(&args, config);
    run_once(&crawler, &params).await;
    Ok(())
}

/// Run discovery on the configured cron cadence until interrupted.
pub(crate) async fn handle_schedule(
    args: CrawlArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let crawler = build_crawler(config, database_url).await?;
    let params = Arc::new(resolve_params(&args, config));
    let cron = config.crawler.cron.clone();

    let mut scheduler = JobScheduler::new().await?;
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let crawler = crawler.clone();
        let params = Arc::clone(&params);
        Box::pin(async move {
            run_once(&crawler, &params).await;
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(cron = %cron, "scheduler started; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await?;
    Ok(())
}
