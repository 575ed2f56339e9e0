//! SQL query builder for listing searches
//!
//! Turns a validated [`ListingFilter`] into one parameterized SELECT.
//! Predicates are ANDed, rows come back in `id` order, pagination is
//! `LIMIT ? OFFSET ?`.

use super::types::{Filter, SqlParams};
use crate::data::types::{ComparableFilter, ListingFilter};

/// Column names of the listings table
pub mod columns {
    pub const ID: &str = "id";
    pub const ADDRESS: &str = "address";
    /// Unicode lower-cased address, the target of substring search
    pub const ADDRESS_LOWER: &str = "address_lower";
    pub const PRICE: &str = "price";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const CATEGORY: &str = "type";

    /// Projection in the order `ListingTuple` expects
    pub const SELECT_LIST: &str = "id, address, price, bedrooms, bathrooms, type";
}

/// SQL text plus its bind values, in placeholder order
#[derive(Debug)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: SqlParams,
}

/// Collect the predicates a filter asks for, in a fixed column order
pub fn listing_filters(filter: &ListingFilter) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(ref address) = filter.address {
        filters.push(Filter::Contains {
            column: columns::ADDRESS_LOWER,
            value: address.clone(),
        });
    }

    let comparables = [
        (columns::PRICE, filter.price),
        (columns::BEDROOMS, filter.bedrooms),
        (columns::BATHROOMS, filter.bathrooms),
    ];
    for (column, comparable) in comparables {
        if let Some(ComparableFilter { op, value }) = comparable {
            filters.push(Filter::Number {
                column,
                operator: op,
                value,
            });
        }
    }

    if let Some(category) = filter.category {
        filters.push(Filter::Equals {
            column: columns::CATEGORY,
            value: category.as_str().to_string(),
        });
    }

    filters
}

/// Build ` WHERE a AND b` (leading space), or an empty string with no filters
pub fn build_where_clause(filters: &[Filter], params: &mut SqlParams) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = filters.iter().map(|f| f.to_sql(params)).collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

/// Build the paginated listing query
pub fn build_list_query(filter: &ListingFilter) -> BuiltQuery {
    let mut params = SqlParams::default();
    let where_clause = build_where_clause(&listing_filters(filter), &mut params);

    let sql = format!(
        "SELECT {} FROM listings{} ORDER BY {} ASC LIMIT ? OFFSET ?",
        columns::SELECT_LIST,
        where_clause,
        columns::ID
    );

    // SQLite integers are signed 64-bit
    params.push_integer(i64::try_from(filter.page_size).unwrap_or(i64::MAX));
    params.push_integer(i64::try_from(filter.offset()).unwrap_or(i64::MAX));

    BuiltQuery { sql, params }
}
