//! Listing rows and the typed inputs of the listing repository

use serde::{Deserialize, Serialize};

use super::enums::{CompareOp, PropertyType};
use crate::core::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

// ============================================================================
// Rows
// ============================================================================

/// Listing row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    pub id: i64,
    pub address: String,
    pub price: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub category: Option<PropertyType>,
}

// ============================================================================
// Filters
// ============================================================================

/// Operator plus value, e.g. `price >= 250000`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparableFilter {
    pub op: CompareOp,
    pub value: f64,
}

impl ComparableFilter {
    pub fn new(op: CompareOp, value: f64) -> Self {
        Self { op, value }
    }
}

/// Validated filters and pagination for one list request
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive substring of the address
    pub address: Option<String>,
    pub price: Option<ComparableFilter>,
    pub bedrooms: Option<ComparableFilter>,
    pub bathrooms: Option<ComparableFilter>,
    pub category: Option<PropertyType>,
    /// 1-indexed
    pub page: u64,
    pub page_size: u64,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            address: None,
            price: None,
            bedrooms: None,
            bathrooms: None,
            category: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingFilter {
    /// Rows skipped before the requested page
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

// ============================================================================
// Writes
// ============================================================================

/// Fully validated listing ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub address: String,
    pub price: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub category: Option<PropertyType>,
}

/// Partial update; `None` leaves the column untouched.
///
/// `category: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub address: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub category: Option<Option<PropertyType>>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.price.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.category.is_none()
    }
}
