//! Listing scrape pipeline.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, Listing, Record, ScrapeProfile};
use crate::services::{FieldExtractor, MarkupSource, PageAggregator, ProcessContext, RecordShaper};
use crate::storage::OutputFile;

/// Records and their shaped listings from one scrape.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub records: Vec<Record>,
    pub listings: Vec<Listing>,
}

/// Scrape every configured page and shape the results.
pub async fn run_scrape<S: MarkupSource + ?Sized>(
    config: &Config,
    profile: &ScrapeProfile,
    source: &S,
) -> Result<ScrapeOutcome> {
    let start_time = Utc::now();
    log::info!("Scraping {} page(s) from {}", config.pages, config.url);

    let extractor = FieldExtractor::new(&profile.rules, ProcessContext::new(config.year))?;
    let aggregator = PageAggregator::new(
        source,
        &extractor,
        profile.item.selector()?,
        &profile.crawler,
    );

    let records = aggregator.collect(&config.url, config.pages).await?;
    let listings = RecordShaper::new(&config.location).shape(&records);

    log::info!(
        "Collected {} listing(s) in {}s",
        listings.len(),
        (Utc::now() - start_time).num_seconds()
    );

    Ok(ScrapeOutcome { records, listings })
}

/// Write listings to the configured output file without persisting.
pub async fn write_output(config: &Config, listings: &[Listing]) -> Result<()> {
    OutputFile::new(&config.data_path).write(listings).await?;
    Ok(())
}
