//! ListingRepository trait implementation for SQLite

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::ListingRepository;
use crate::data::types::{ListingFilter, ListingPatch, ListingRow, NewListing};

use super::SqliteService;
use super::repositories::listing;

#[async_trait]
impl ListingRepository for Arc<SqliteService> {
    async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<ListingRow>, DataError> {
        listing::list_listings(self.pool(), filter)
            .await
            .map_err(Into::into)
    }

    async fn get_listing(&self, id: i64) -> Result<Option<ListingRow>, DataError> {
        listing::get_listing(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn create_listing(&self, new: &NewListing) -> Result<ListingRow, DataError> {
        listing::create_listing(self.pool(), new)
            .await
            .map_err(Into::into)
    }

    async fn update_listing(
        &self,
        id: i64,
        patch: &ListingPatch,
    ) -> Result<Option<ListingRow>, DataError> {
        listing::update_listing(self.pool(), id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_listing(&self, id: i64) -> Result<bool, DataError> {
        listing::delete_listing(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn count_listings(&self) -> Result<u64, DataError> {
        listing::count_listings(self.pool())
            .await
            .map_err(Into::into)
    }
}
