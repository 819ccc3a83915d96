//! Full run: scrape, then persist.

use crate::error::Result;
use crate::models::{Config, ScrapeProfile};
use crate::services::MarkupSource;
use crate::storage::{PersistReport, Persister};

use super::persist::run_persist;
use super::scrape::{ScrapeOutcome, run_scrape};

/// Result of a full scrape-and-persist run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub scrape: ScrapeOutcome,
    pub report: PersistReport,
}

/// Run the full pipeline: scrape, then persist.
pub async fn run_pipeline<S, P>(
    config: &Config,
    profile: &ScrapeProfile,
    source: &S,
    persister: &P,
) -> Result<PipelineOutcome>
where
    S: MarkupSource + ?Sized,
    P: Persister + ?Sized,
{
    log::info!("[STEP 1/2] Scrape - Fetching listings");
    let scrape = run_scrape(config, profile, source).await?;

    log::info!("[STEP 2/2] Persist - Saving dataset {}", config.dataset);
    let report = run_persist(persister, &scrape.listings).await?;

    Ok(PipelineOutcome { scrape, report })
}
