// crates/pocketknife-core/src/pipeline.rs
//
// End-to-end treasury run: classify -> schedule fetches -> aggregate.

use std::sync::Arc;

use crate::aggregator::{aggregate, TreasuryReport};
use crate::classifier::classify;
use crate::error::TreasuryError;
use crate::input::TreasuryInput;
use crate::role::Role;
use crate::scheduler::{FetchScheduler, DEFAULT_MAX_WORKERS};
use crate::traits::ChainQuery;

/// Options for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Worker pool size. Must be at least 1.
    pub max_workers: usize,
    /// Reject inputs that declare an address more than once instead of
    /// keeping the first occurrence.
    pub strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            strict: false,
        }
    }
}

/// Run the whole pipeline over one input batch.
///
/// # Errors
/// `TreasuryError::Config` for an invalid worker count and
/// `TreasuryError::InputParse` for duplicates in strict mode. Both are
/// raised before any fetch. Fetch failures never error here; they are
/// listed in the returned report.
pub async fn run_treasury<C: ChainQuery + 'static>(
    client: Arc<C>,
    input: &TreasuryInput,
    options: &RunOptions,
) -> Result<TreasuryReport, TreasuryError> {
    let scheduler = FetchScheduler::new(client, options.max_workers)?;

    let classification = classify(input);
    for dup in &classification.duplicates {
        if dup.kept == dup.dropped {
            tracing::warn!(
                "Address {} listed more than once under {}; counting it once",
                dup.address,
                dup.kept
            );
        } else {
            tracing::warn!(
                "Address {} appears in {} and {}; counting it under {} only",
                dup.address,
                dup.kept,
                dup.dropped,
                dup.kept
            );
        }
    }

    let entries = if options.strict {
        classification.into_strict()?
    } else {
        classification.entries
    };

    for role in Role::ALL {
        let n = entries.iter().filter(|e| e.role == role).count();
        if n > 0 {
            tracing::info!("Querying {} {} addresses", n, role);
        }
    }
    tracing::info!(
        "Starting treasury analysis: {} addresses | max workers: {}",
        entries.len(),
        scheduler.max_workers()
    );

    let results = scheduler.run(entries).await;
    let report = aggregate(results);

    tracing::info!(
        "All queries completed: {}/{} succeeded",
        report.succeeded(),
        report.requested()
    );

    Ok(report)
}
