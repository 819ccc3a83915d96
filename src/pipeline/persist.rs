//! Hand-off of listings to the persistence backend.

use crate::error::Result;
use crate::models::Listing;
use crate::storage::{PersistReport, Persister};

/// Persist listings and log the external tool's response.
///
/// An output that still carries the error marker after all attempts is
/// logged, not raised; callers inspect the returned report.
pub async fn run_persist<P: Persister + ?Sized>(
    persister: &P,
    listings: &[Listing],
) -> Result<PersistReport> {
    log::info!("Persisting {} listing(s)", listings.len());
    let report = persister.persist(listings).await?;

    if report.succeeded {
        log::info!("Persisted after {} attempt(s)", report.attempts);
    } else {
        log::warn!(
            "Persist command still reported an error after {} attempt(s)",
            report.attempts
        );
    }
    if !report.output.trim().is_empty() {
        log::info!("{}", report.output.trim());
    }

    Ok(report)
}
