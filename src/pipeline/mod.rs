//! Pipeline entry points for scraper operations.
//!
//! - `run_scrape`: Fetch result pages and extract listings
//! - `run_persist`: Hand listings to the external dataset tool
//! - `run_pipeline`: Both, in order

mod persist;
mod pipeline;
mod scrape;

pub use persist::run_persist;
pub use pipeline::{PipelineOutcome, run_pipeline};
pub use scrape::{ScrapeOutcome, run_scrape, write_output};
