//! Listing query filters
//!
//! Translates a validated [`ListingFilter`](crate::data::types::ListingFilter)
//! into parameterized SQL for the listings table.
//!
//! ## Usage
//!
//! ```
//! use listings_server::data::filters::build_list_query;
//! use listings_server::data::types::ListingFilter;
//!
//! let built = build_list_query(&ListingFilter::default());
//! assert!(built.sql.ends_with("ORDER BY id ASC LIMIT ? OFFSET ?"));
//! assert_eq!(built.params.values.len(), 2);
//! ```

mod builder;
mod types;

pub use builder::{BuiltQuery, build_list_query, build_where_clause, columns, listing_filters};
pub use types::{Filter, SqlParams, SqlValue};
