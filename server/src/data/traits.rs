//! Repository traits for the data layer
//!
//! The listing service depends on `ListingRepository` only, never on a
//! concrete backend.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{ListingFilter, ListingPatch, ListingRow, NewListing};

/// Persistence operations for listings
///
/// Implemented by the SQLite backend.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Page of listings matching the filter, ordered by id ascending
    async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<ListingRow>, DataError>;

    async fn get_listing(&self, id: i64) -> Result<Option<ListingRow>, DataError>;

    /// Insert and return the stored row with its assigned id
    async fn create_listing(&self, new: &NewListing) -> Result<ListingRow, DataError>;

    /// Apply a partial update; `None` if the id does not exist
    async fn update_listing(
        &self,
        id: i64,
        patch: &ListingPatch,
    ) -> Result<Option<ListingRow>, DataError>;

    /// Remove a listing; `false` if nothing was deleted
    async fn delete_listing(&self, id: i64) -> Result<bool, DataError>;

    async fn count_listings(&self) -> Result<u64, DataError>;
}
