//! Domain logic
//!
//! - `listings` - Listing validation and the listing service

pub mod listings;

pub use listings::{ListingError, ListingInput, ListingQuery, ListingService};
