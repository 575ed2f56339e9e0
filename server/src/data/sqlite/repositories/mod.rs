//! SQLite repositories
//!
//! Row types (ListingRow, etc.) should be imported from `crate::data::types`.

pub mod listing;

pub use listing::{
    count_listings, create_listing, delete_listing, get_listing, list_listings, update_listing,
};
