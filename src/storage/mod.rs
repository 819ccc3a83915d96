//! Persistence of scraped listings.
//!
//! Listings are written to a local JSON file and then handed to an external
//! dataset-versioning command:
//!
//! ```text
//! {data dir}/
//! ├── data.json          # Latest run
//! └── prev_data.json     # Previous run
//! ```

pub mod local;
pub mod shell;

use async_trait::async_trait;

use crate::error::PersistError;
use crate::models::Listing;

// Re-export for convenience
pub use local::OutputFile;
pub use shell::{CommandOutput, CommandRunner, ProcessRunner, ShellPersister};

/// Outcome of handing listings to the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    /// Standard output of the final attempt
    pub output: String,
    /// Number of attempts made
    pub attempts: u32,
    /// False when the final output still carried the error marker
    pub succeeded: bool,
}

/// Trait for listing persistence backends.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn persist(&self, listings: &[Listing]) -> Result<PersistReport, PersistError>;
}
