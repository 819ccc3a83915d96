//! Page aggregator.
//!
//! Fetches result pages one at a time in page order and concatenates the
//! records extracted from each.

use std::time::Duration;

use scraper::Selector;

use crate::error::Result;
use crate::models::{CrawlerConfig, Record};
use crate::services::extractor::FieldExtractor;
use crate::services::markup::{MarkupSource, find_all, page_query};

/// Drives fetching and extraction across pages.
pub struct PageAggregator<'a, S: MarkupSource + ?Sized> {
    source: &'a S,
    extractor: &'a FieldExtractor,
    item_selector: Selector,
    crawler: &'a CrawlerConfig,
}

impl<'a, S: MarkupSource + ?Sized> PageAggregator<'a, S> {
    pub fn new(
        source: &'a S,
        extractor: &'a FieldExtractor,
        item_selector: Selector,
        crawler: &'a CrawlerConfig,
    ) -> Self {
        Self {
            source,
            extractor,
            item_selector,
            crawler,
        }
    }

    /// Scrape pages `1..=pages` of `url` sequentially.
    ///
    /// The first failed fetch aborts the run; nothing collected so far is kept.
    pub async fn collect(&self, url: &str, pages: u32) -> Result<Vec<Record>> {
        let delay = Duration::from_millis(self.crawler.request_delay_ms);
        let mut records = Vec::new();

        for page_num in 1..=pages {
            let page_records = self.collect_page(url, page_num).await?;
            log::info!(
                "Page {}/{}: {} item(s)",
                page_num,
                pages,
                page_records.len()
            );
            records.extend(page_records);

            if page_num < pages && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(records)
    }

    /// Fetch and extract a single page.
    pub async fn collect_page(&self, url: &str, page_num: u32) -> Result<Vec<Record>> {
        let query = page_query(self.crawler, page_num);
        let document = self.source.fetch(url, &query).await?;
        let items = find_all(document.root_element(), &self.item_selector);
        Ok(self.extractor.extract(&items, page_num))
    }
}
