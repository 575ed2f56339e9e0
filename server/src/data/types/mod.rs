//! Shared data types for the listings store
//!
//! Row types returned by repositories and the typed inputs they accept.

mod enums;
mod listing;

pub use enums::{CompareOp, PropertyType};
pub use listing::{ComparableFilter, ListingFilter, ListingPatch, ListingRow, NewListing};
