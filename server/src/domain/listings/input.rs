//! Raw listing candidates as they arrive from the boundary
//!
//! [`ListingQuery`] holds list query parameters as text and coerces the
//! numeric ones. [`ListingInput`] holds a JSON body untouched, keeping `null`
//! distinct from an absent key. Both convert into typed data layer values
//! only after validation has passed.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::validation::{Candidate, ConstraintKind, Field, FieldValue, Violations};
use crate::data::types::{
    ComparableFilter, CompareOp, ListingFilter, ListingPatch, NewListing, PropertyType,
};

// ============================================================================
// Query parameters
// ============================================================================

/// List query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Case-insensitive address substring
    pub address: Option<String>,
    /// Price compared with `priceOperand`
    pub price: Option<String>,
    /// One of `<`, `<=`, `=`, `>=`, `>`; required with `price`
    pub price_operand: Option<String>,
    pub bedrooms: Option<String>,
    /// Required with `bedrooms`
    pub bedrooms_operand: Option<String>,
    pub bathrooms: Option<String>,
    /// Required with `bathrooms`
    pub bathrooms_operand: Option<String>,
    /// Townhouse, Condominium or SingleFamilyResidence
    #[serde(rename = "type")]
    pub category: Option<String>,
    /// 1-indexed page, default 1
    pub page: Option<String>,
    /// Rows per page, default 10
    pub page_size: Option<String>,
}

impl Candidate for ListingQuery {
    fn value(&self, field: Field) -> FieldValue {
        match field {
            Field::Address => FieldValue::from_query_text(self.address.as_deref()),
            Field::Price => FieldValue::from_query_number(self.price.as_deref()),
            Field::PriceOperand => FieldValue::from_query_text(self.price_operand.as_deref()),
            Field::Bedrooms => FieldValue::from_query_number(self.bedrooms.as_deref()),
            Field::BedroomsOperand => {
                FieldValue::from_query_text(self.bedrooms_operand.as_deref())
            }
            Field::Bathrooms => FieldValue::from_query_number(self.bathrooms.as_deref()),
            Field::BathroomsOperand => {
                FieldValue::from_query_text(self.bathrooms_operand.as_deref())
            }
            Field::Category => FieldValue::from_query_text(self.category.as_deref()),
            Field::Page => FieldValue::from_query_number(self.page.as_deref()),
            Field::PageSize => FieldValue::from_query_number(self.page_size.as_deref()),
        }
    }
}

impl ListingQuery {
    /// Typed filter; call after the `filter` rule set has passed.
    ///
    /// Anything that would not have passed validation falls back to "no
    /// predicate" or the pagination default.
    pub fn to_filter(&self) -> ListingFilter {
        let defaults = ListingFilter::default();
        ListingFilter {
            address: self.address.clone().filter(|a| !a.is_empty()),
            price: self.comparable(Field::Price, Field::PriceOperand),
            bedrooms: self.comparable(Field::Bedrooms, Field::BedroomsOperand),
            bathrooms: self.comparable(Field::Bathrooms, Field::BathroomsOperand),
            category: self.category.as_deref().and_then(PropertyType::parse),
            page: self.whole_number(Field::Page).unwrap_or(defaults.page),
            page_size: self
                .whole_number(Field::PageSize)
                .unwrap_or(defaults.page_size),
        }
    }

    fn comparable(&self, value: Field, operand: Field) -> Option<ComparableFilter> {
        let value = self.value(value).as_number()?;
        let op = self.value(operand).as_text().and_then(CompareOp::parse)?;
        Some(ComparableFilter::new(op, value))
    }

    fn whole_number(&self, field: Field) -> Option<u64> {
        self.value(field)
            .as_number()
            .filter(|n| *n >= 1.0 && n.fract() == 0.0)
            .map(|n| n as u64)
    }
}

// ============================================================================
// JSON body
// ============================================================================

/// Listing body for create and update
///
/// Fields are kept as raw JSON so that type errors surface as violations
/// rather than as body parse failures.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "address": "12 Harbour Rd",
    "price": 425000,
    "bedrooms": 3,
    "bathrooms": 2,
    "type": "Townhouse"
}))]
pub struct ListingInput {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub bedrooms: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub bathrooms: Option<Value>,
    #[serde(rename = "type", default, deserialize_with = "present")]
    #[schema(value_type = Option<PropertyType>)]
    pub category: Option<Value>,
}

/// A key that is present maps to `Some`, even when its value is `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Candidate for ListingInput {
    fn value(&self, field: Field) -> FieldValue {
        let raw = match field {
            Field::Address => self.address.as_ref(),
            Field::Price => self.price.as_ref(),
            Field::Bedrooms => self.bedrooms.as_ref(),
            Field::Bathrooms => self.bathrooms.as_ref(),
            Field::Category => self.category.as_ref(),
            _ => None,
        };
        FieldValue::from_json(raw)
    }
}

impl ListingInput {
    /// Insertable listing; call after the `create` rule set has passed
    pub fn to_new_listing(&self) -> Result<NewListing, Violations> {
        Ok(NewListing {
            address: require(Field::Address, self.text(Field::Address))?,
            price: require(Field::Price, self.number(Field::Price))?,
            bedrooms: require(Field::Bedrooms, self.integer(Field::Bedrooms))?,
            bathrooms: require(Field::Bathrooms, self.integer(Field::Bathrooms))?,
            category: self.category().flatten(),
        })
    }

    /// Partial update; call after the `update` rule set has passed
    pub fn to_patch(&self) -> ListingPatch {
        ListingPatch {
            address: self.text(Field::Address),
            price: self.number(Field::Price),
            bedrooms: self.integer(Field::Bedrooms),
            bathrooms: self.integer(Field::Bathrooms),
            category: self.category(),
        }
    }

    fn text(&self, field: Field) -> Option<String> {
        self.value(field).as_text().map(str::to_string)
    }

    fn number(&self, field: Field) -> Option<f64> {
        self.value(field).as_number()
    }

    fn integer(&self, field: Field) -> Option<i64> {
        self.number(field)
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    }

    /// `None` when absent, `Some(None)` when null
    fn category(&self) -> Option<Option<PropertyType>> {
        match self.value(Field::Category) {
            FieldValue::Absent => None,
            FieldValue::Text(name) => Some(PropertyType::parse(&name)),
            _ => Some(None),
        }
    }
}

fn require<T>(field: Field, value: Option<T>) -> Result<T, Violations> {
    value.ok_or_else(|| {
        Violations::single(
            field,
            ConstraintKind::Required,
            format!("{} is required", field),
        )
    })
}
