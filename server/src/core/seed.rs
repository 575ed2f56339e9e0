//! Bulk import of listings from a JSON file

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::domain::{ListingError, ListingInput, ListingService};

/// Result of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Imported(usize),
    /// `--if-empty` was given and the store already held this many listings
    Skipped(u64),
}

/// Parse a JSON array of listing candidates
pub fn parse_seed_file(contents: &str) -> Result<Vec<ListingInput>> {
    serde_json::from_str(contents).context("Seed file must contain a JSON array of listings")
}

/// Import every record in `path` through the create rule set
///
/// Stops at the first record that fails; records before it stay imported and
/// the error reports how many there were.
pub async fn seed_listings(
    listings: &ListingService,
    path: &Path,
    if_empty: bool,
) -> Result<SeedOutcome> {
    if if_empty {
        let existing = listings.count().await?;
        if existing > 0 {
            tracing::debug!(existing, "Store not empty, skipping seed");
            return Ok(SeedOutcome::Skipped(existing));
        }
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let records = parse_seed_file(&contents)?;

    for (index, record) in records.iter().enumerate() {
        match listings.create(record).await {
            Ok(row) => tracing::trace!(index, id = row.id, "Seeded listing"),
            Err(ListingError::Validation(violations)) => {
                bail!(
                    "Record {} is invalid ({} imported before it): {}",
                    index,
                    index,
                    violations
                )
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to import record {} ({} imported before it)", index, index)
                });
            }
        }
    }

    tracing::debug!(count = records.len(), "Seed complete");
    Ok(SeedOutcome::Imported(records.len()))
}
