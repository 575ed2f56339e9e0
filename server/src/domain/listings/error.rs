use thiserror::Error;

use super::validation::Violations;
use crate::data::DataError;

/// Failure of a listing service operation
#[derive(Error, Debug)]
pub enum ListingError {
    /// Candidate failed its rule set; nothing was written
    #[error("Validation failed: {0}")]
    Validation(Violations),

    #[error("Listing {0} not found")]
    NotFound(i64),

    /// Store error, not retried
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DataError),
}

impl From<Violations> for ListingError {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations)
    }
}
