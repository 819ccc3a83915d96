//! Domain models for the scraper application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod config;
mod listing;
mod record;
mod rule;

// Re-export all public types
pub use config::{Config, CrawlerConfig, PersistConfig, ScrapeProfile};
pub use listing::{CURRENCY, Listing, NamedPlace, PRICE_PROPERTY, Place, PropertyValue};
pub use record::{FieldValue, PAGE_FIELD, Record};
pub use rule::{Accessor, ExtractionRule, Locator, PostProcessor};
