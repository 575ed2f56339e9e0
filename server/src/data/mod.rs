//! Data storage layer
//!
//! - `sqlite` - SQLite service, schema, migrations and repositories
//! - `filters` - Listing filter predicates and SQL query building
//! - `types` - Row types and typed repository inputs
//! - `traits` - Repository traits the domain layer depends on
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod filters;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::ListingRepository;
pub use types::{
    CompareOp, ComparableFilter, ListingFilter, ListingPatch, ListingRow, NewListing, PropertyType,
};
