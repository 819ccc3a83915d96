//! Application configuration structures.
//!
//! Run settings come from the environment (`Config`); what to scrape and how
//! comes from an optional TOML profile (`ScrapeProfile`).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ExtractionRule, Locator, PAGE_FIELD, PostProcessor};

/// Environment variable names.
pub mod env {
    pub const DATASET: &str = "CLASSIFIEDS_DATASET";
    pub const URL: &str = "CLASSIFIEDS_URL";
    pub const DATA_PATH: &str = "CLASSIFIEDS_DATA_PATH";
    pub const STRUCTURE_PATH: &str = "CLASSIFIEDS_STRUCTURE_PATH";
    pub const META_PATH: &str = "CLASSIFIEDS_META_PATH";
    pub const LOCATION: &str = "CLASSIFIEDS_LOCATION";
    pub const PAGES: &str = "CLASSIFIEDS_PAGES";
    pub const PERSIST_COMMAND: &str = "CLASSIFIEDS_PERSIST_COMMAND";
    pub const PROFILE: &str = "CLASSIFIEDS_PROFILE";
    pub const YEAR: &str = "CLASSIFIEDS_YEAR";
}

/// Output field names produced by the default rules and read by the shaper.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const URL: &str = "url";
    pub const PRICE: &str = "price";
    pub const NEIGHBORHOOD: &str = "neighborhood";
    pub const DATE: &str = "date";
}

/// Default external command. Tokenized with shell quoting rules, then
/// placeholders are substituted per argument.
pub const DEFAULT_PERSIST_COMMAND: &str =
    "qri add --data {data} --structure {structure} --meta {meta} {dataset}";

/// Run settings supplied through the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Dataset name handed to the external tool
    pub dataset: String,

    /// Listing search URL
    pub url: String,

    /// Output JSON path
    pub data_path: PathBuf,

    /// Structure file for the external tool
    pub structure_path: PathBuf,

    /// Metadata file for the external tool
    pub meta_path: PathBuf,

    /// Name of the place every neighborhood is contained in
    pub location: String,

    /// Number of pages to scrape
    pub pages: u32,

    /// External command template
    pub persist_command: String,

    /// Optional scrape profile path
    pub profile_path: Option<PathBuf>,

    /// Year appended to year-less dates; fixed for the whole run
    pub year: i32,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// The processing year defaults to the current local year, read once here.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), Local::now().year())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Every missing required key is reported in a single error.
    pub fn from_lookup<F>(lookup: F, default_year: i32) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let dataset = required(env::DATASET);
        let url = required(env::URL);
        let data_path = required(env::DATA_PATH);
        let structure_path = required(env::STRUCTURE_PATH);
        let meta_path = required(env::META_PATH);
        let location = required(env::LOCATION);
        let pages = required(env::PAGES);

        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        let pages = match pages.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(AppError::config(format!(
                    "{} must be a positive integer, got '{pages}'",
                    env::PAGES
                )));
            }
        };

        let year = match get(env::YEAR) {
            Some(raw) => raw.parse::<i32>().map_err(|_| {
                AppError::config(format!("{} must be a year, got '{raw}'", env::YEAR))
            })?,
            None => default_year,
        };

        Ok(Self {
            dataset,
            url,
            data_path: PathBuf::from(data_path),
            structure_path: PathBuf::from(structure_path),
            meta_path: PathBuf::from(meta_path),
            location,
            pages,
            persist_command: get(env::PERSIST_COMMAND)
                .unwrap_or_else(|| DEFAULT_PERSIST_COMMAND.to_string()),
            profile_path: get(env::PROFILE).map(PathBuf::from),
            year,
        })
    }

    /// Validate values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "target URL must be http(s): {}",
                self.url
            )));
        }
        match shlex::split(&self.persist_command) {
            None => {
                return Err(AppError::validation(format!(
                    "persist command has unbalanced quotes: {}",
                    self.persist_command
                )));
            }
            Some(argv) if argv.is_empty() => {
                return Err(AppError::validation("persist command is empty"));
            }
            Some(_) => {}
        }
        Ok(())
    }
}

/// HTTP and paging behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between page requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Items per result page; page `n` starts at offset `page_size * (n - 1)`
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Query parameter carrying the offset
    #[serde(default = "defaults::offset_param")]
    pub offset_param: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            page_size: defaults::page_size(),
            offset_param: defaults::offset_param(),
        }
    }
}

/// Retry policy for the external dataset command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistConfig {
    /// Total attempts, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,

    /// Marker that flags an attempt's output as failed
    #[serde(default = "defaults::error_marker")]
    pub error_marker: String,

    /// Number of leading output characters searched for the marker
    #[serde(default = "defaults::marker_window")]
    pub marker_window: usize,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            retry_delay_ms: defaults::retry_delay(),
            error_marker: defaults::error_marker(),
            marker_window: defaults::marker_window(),
        }
    }
}

/// What to scrape: the item locator and the ordered extraction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeProfile {
    /// Locator for one listing on a results page
    #[serde(default = "defaults::item_locator")]
    pub item: Locator,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub persist: PersistConfig,

    /// Extraction rules, in output order
    #[serde(default = "defaults::rules")]
    pub rules: Vec<ExtractionRule>,
}

impl ScrapeProfile {
    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate rules and settings for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(AppError::validation("No extraction rules defined"));
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.field.trim().is_empty() {
                return Err(AppError::validation("rule with empty field name"));
            }
            if rule.field == PAGE_FIELD {
                return Err(AppError::validation(format!(
                    "field name '{PAGE_FIELD}' is reserved"
                )));
            }
            if !seen.insert(rule.field.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate field name '{}'",
                    rule.field
                )));
            }
            rule.locator.selector()?;
        }

        self.item.selector()?;

        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.offset_param.trim().is_empty() {
            return Err(AppError::validation("crawler.offset_param is empty"));
        }
        if self.persist.max_attempts == 0 {
            return Err(AppError::validation("persist.max_attempts must be > 0"));
        }
        Ok(())
    }
}

impl Default for ScrapeProfile {
    fn default() -> Self {
        Self {
            item: defaults::item_locator(),
            crawler: CrawlerConfig::default(),
            persist: PersistConfig::default(),
            rules: defaults::rules(),
        }
    }
}

mod defaults {
    use super::{ExtractionRule, Locator, PostProcessor, fields};

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; classifieds/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        0
    }
    pub fn page_size() -> u32 {
        120
    }
    pub fn offset_param() -> String {
        "s".into()
    }

    // Persist defaults
    pub fn max_attempts() -> u32 {
        10
    }
    pub fn retry_delay() -> u64 {
        100
    }
    pub fn error_marker() -> String {
        "error".into()
    }
    pub fn marker_window() -> usize {
        15
    }

    // Listing defaults
    pub fn item_locator() -> Locator {
        Locator::class("result-row")
    }

    pub fn rules() -> Vec<ExtractionRule> {
        vec![
            ExtractionRule::text("result-title", fields::TITLE),
            ExtractionRule::link("result-title", fields::URL),
            ExtractionRule::text("result-price", fields::PRICE)
                .with_processor(PostProcessor::Number),
            ExtractionRule::text("result-hood", fields::NEIGHBORHOOD),
            ExtractionRule::text("result-date", fields::DATE).with_processor(PostProcessor::Date),
        ]
    }
}
