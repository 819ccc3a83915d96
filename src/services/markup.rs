//! Markup source: fetches result pages and locates nodes within them.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::CrawlerConfig;
use crate::utils::http;

/// Source of parsed result pages.
#[async_trait]
pub trait MarkupSource: Send + Sync {
    /// Fetch `url` with `query` appended and parse the body as HTML.
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> Result<Html>;
}

/// Markup source backed by HTTP.
pub struct HttpMarkupSource {
    client: Client,
}

impl HttpMarkupSource {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
        })
    }
}

#[async_trait]
impl MarkupSource for HttpMarkupSource {
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> Result<Html> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        log::debug!("GET {} {:?}", url, query);
        let text = request.send().await?.error_for_status()?.text().await?;
        Ok(Html::parse_document(&text))
    }
}

/// All descendants of `node` matching `selector`, in document order.
pub fn find_all<'a>(node: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    node.select(selector).collect()
}

/// First descendant of `node` matching `selector`.
pub fn find<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

/// Query parameters for a 1-based page number.
///
/// The first page carries no offset.
pub fn page_query(config: &CrawlerConfig, page_num: u32) -> Vec<(String, String)> {
    if page_num <= 1 {
        return Vec::new();
    }
    let offset = u64::from(config.page_size) * u64::from(page_num - 1);
    vec![(config.offset_param.clone(), offset.to_string())]
}
