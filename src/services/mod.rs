//! Service layer for the scraper application.
//!
//! This module contains the business logic for:
//! - Fetching and querying result pages (`MarkupSource`)
//! - Rule-driven field extraction (`FieldExtractor`)
//! - Typed post-processing of raw values (`ProcessContext`)
//! - Paging across results (`PageAggregator`)
//! - Mapping records to the output shape (`RecordShaper`)

mod aggregator;
mod extractor;
pub mod markup;
pub mod postprocess;
mod shaper;

pub use aggregator::PageAggregator;
pub use extractor::FieldExtractor;
pub use markup::{HttpMarkupSource, MarkupSource};
pub use postprocess::ProcessContext;
pub use shaper::RecordShaper;
