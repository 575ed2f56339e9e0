//! Property listings
//!
//! - `validation` - Declarative rule table for the create, update and filter rule sets
//! - `input` - Raw query and body candidates, converted to typed values after validation
//! - `service` - Validates, then reads and writes through `ListingRepository`
//! - `error` - `ListingError` returned by every service operation

mod error;
mod input;
mod service;
pub mod validation;

pub use error::ListingError;
pub use input::{ListingInput, ListingQuery};
pub use service::ListingService;
pub use validation::{ConstraintKind, Violation, Violations};
