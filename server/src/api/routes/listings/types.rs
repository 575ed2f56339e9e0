//! Listing API types

use serde::Serialize;
use utoipa::ToSchema;

use crate::data::types::{ListingRow, PropertyType};

/// Listing as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "12 Harbour Rd")]
    pub address: String,
    #[schema(example = 425000)]
    pub price: f64,
    #[schema(example = 3)]
    pub bedrooms: i64,
    #[schema(example = 2)]
    pub bathrooms: i64,
    /// `null` when no category is set
    #[serde(rename = "type")]
    pub category: Option<PropertyType>,
}

impl From<ListingRow> for ListingDto {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            address: row.address,
            price: row.price,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            category: row.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_wire_shape() {
        let dto = ListingDto::from(ListingRow {
            id: 7,
            address: "1 Main St".to_string(),
            price: 1.5,
            bedrooms: 2,
            bathrooms: 1,
            category: None,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "address": "1 Main St",
                "price": 1.5,
                "bedrooms": 2,
                "bathrooms": 1,
                "type": null
            })
        );
    }
}
