//! End-to-end pipeline runs against canned result pages.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use scraper::Html;
use tempfile::TempDir;

use classifieds::error::{AppError, PersistError, Result};
use classifieds::models::{Config, FieldValue, Listing, PersistConfig, ScrapeProfile};
use classifieds::pipeline::{run_pipeline, run_scrape, write_output};
use classifieds::services::MarkupSource;
use classifieds::storage::{CommandOutput, CommandRunner, OutputFile, ShellPersister};

const PAGE_ONE: &str = r#"
<html><body><ul class="rows">
  <li class="result-row">
    <time class="result-date">Jan 5</time>
    <a href="https://example.org/fuo/1.html" class="result-title hdrlnk">Free couch</a>
    <span class="result-meta"><span class="result-hood"> (Astoria)</span></span>
  </li>
</ul></body></html>
"#;

const PAGE_TWO: &str = r#"
<html><body><ul class="rows">
  <li class="result-row">
    <time class="result-date">Feb 30</time>
    <a href="https://example.org/fuo/2.html" class="result-title hdrlnk">Bookshelf</a>
    <span class="result-meta"><span class="result-price">$50</span></span>
  </li>
</ul></body></html>
"#;

/// Serves pages keyed by the offset query value.
struct StaticSource {
    pages: HashMap<String, &'static str>,
    urls: Mutex<Vec<String>>,
}

impl StaticSource {
    fn two_pages() -> Self {
        Self {
            pages: HashMap::from([(String::new(), PAGE_ONE), ("120".to_string(), PAGE_TWO)]),
            urls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarkupSource for StaticSource {
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> Result<Html> {
        self.urls.lock().unwrap().push(url.to_string());
        let offset = query
            .iter()
            .find(|(key, _)| key == "s")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        let page = self
            .pages
            .get(&offset)
            .ok_or_else(|| AppError::validation(format!("no page at offset {offset}")))?;
        Ok(Html::parse_document(page))
    }
}

/// Always answers with the same stdout.
struct FixedRunner(&'static str);

#[async_trait]
impl CommandRunner for FixedRunner {
    async fn run(&self, _argv: &[String]) -> std::result::Result<CommandOutput, PersistError> {
        Ok(CommandOutput {
            stdout: self.0.to_string(),
            stderr: String::new(),
        })
    }
}

fn config(dir: &TempDir, pages: &str) -> Config {
    let data_path = dir.path().join("data.json");
    let data_path = data_path.to_string_lossy().into_owned();
    let vars = HashMap::from([
        ("CLASSIFIEDS_DATASET", "me/craigslist".to_string()),
        ("CLASSIFIEDS_URL", "https://example.org/search/zip".to_string()),
        ("CLASSIFIEDS_DATA_PATH", data_path),
        ("CLASSIFIEDS_STRUCTURE_PATH", "structure.json".to_string()),
        ("CLASSIFIEDS_META_PATH", "meta.json".to_string()),
        ("CLASSIFIEDS_LOCATION", "New York City".to_string()),
        ("CLASSIFIEDS_PAGES", pages.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned(), 2024).unwrap()
}

fn persister(config: &Config, stdout: &'static str) -> ShellPersister<FixedRunner> {
    ShellPersister::from_parts(
        OutputFile::new(&config.data_path),
        vec!["qri".to_string(), "add".to_string()],
        PersistConfig {
            retry_delay_ms: 0,
            ..PersistConfig::default()
        },
        FixedRunner(stdout),
    )
    .unwrap()
}

#[tokio::test]
async fn two_pages_one_item_each() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "2");
    let source = StaticSource::two_pages();

    let outcome = run_pipeline(
        &config,
        &ScrapeProfile::default(),
        &source,
        &persister(&config, "dataset saved"),
    )
    .await
    .unwrap();

    let records = &outcome.scrape.records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].page_num(), 1);
    assert_eq!(records[1].page_num(), 2);

    let listings = &outcome.scrape.listings;
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].additional_property.value, None);
    assert_eq!(
        listings[1].additional_property.value,
        Some(FieldValue::Number(50.0))
    );
    assert_eq!(listings[0].date, Some(FieldValue::from("2024-01-05")));
    assert_eq!(listings[1].date, None);
    assert_eq!(
        listings[0].contained_in.name,
        Some(FieldValue::from(" (Astoria)"))
    );

    assert_eq!(outcome.report.attempts, 1);
    assert!(outcome.report.succeeded);
    assert_eq!(source.urls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn output_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "2");
    let source = StaticSource::two_pages();

    let outcome = run_scrape(&config, &ScrapeProfile::default(), &source)
        .await
        .unwrap();
    write_output(&config, &outcome.listings).await.unwrap();

    let text = std::fs::read_to_string(&config.data_path).unwrap();
    let reread: Vec<Listing> = serde_json::from_str(&text).unwrap();
    assert_eq!(reread, outcome.listings);

    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    let first = &raw[0];
    assert_eq!(first["name"], "Free couch");
    assert_eq!(first["url"], "https://example.org/fuo/1.html");
    assert_eq!(first["containedIn"]["containedInPlace"]["name"], "New York City");
    assert_eq!(first["additionalProperty"]["currency"], "USD");
    assert!(first["additionalProperty"]["value"].is_null());
    assert_eq!(raw[1]["additionalProperty"]["value"], 50.0);
}

#[tokio::test]
async fn exhausted_retries_are_not_an_error() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "1");

    let outcome = run_pipeline(
        &config,
        &ScrapeProfile::default(),
        &StaticSource::two_pages(),
        &persister(&config, "error: repo locked"),
    )
    .await
    .unwrap();

    assert_eq!(outcome.report.attempts, 10);
    assert!(!outcome.report.succeeded);
    assert_eq!(outcome.report.output, "error: repo locked");
}

#[tokio::test]
async fn rerun_backs_up_previous_output() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "1");
    let profile = ScrapeProfile::default();
    let persister = persister(&config, "ok");

    run_pipeline(&config, &profile, &StaticSource::two_pages(), &persister)
        .await
        .unwrap();
    run_pipeline(&config, &profile, &StaticSource::two_pages(), &persister)
        .await
        .unwrap();

    let backup = dir.path().join("prev_data.json");
    assert!(backup.exists());
    assert_eq!(
        std::fs::read(&backup).unwrap(),
        std::fs::read(&config.data_path).unwrap()
    );
}

#[tokio::test]
async fn fetch_failure_aborts_before_persist() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "3");

    let result = run_pipeline(
        &config,
        &ScrapeProfile::default(),
        &StaticSource::two_pages(),
        &persister(&config, "ok"),
    )
    .await;

    assert!(result.is_err());
    assert!(!config.data_path.exists());
}

#[tokio::test]
async fn rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "2");
    let profile = ScrapeProfile::default();

    let first = run_scrape(&config, &profile, &StaticSource::two_pages())
        .await
        .unwrap();
    let second = run_scrape(&config, &profile, &StaticSource::two_pages())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_vec(&first.records).unwrap(),
        serde_json::to_vec(&second.records).unwrap()
    );
    assert_eq!(
        serde_json::to_vec_pretty(&first.listings).unwrap(),
        serde_json::to_vec_pretty(&second.listings).unwrap()
    );
}
