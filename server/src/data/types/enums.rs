//! Closed enumerations shared by the filter builder, the validators and the API
//!
//! Both enums only ever reach SQL through their `as_str`/`as_sql` tags, never
//! through caller-supplied text.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// ============================================================================
// PROPERTY TYPE
// ============================================================================

/// Kind of property a listing describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PropertyType {
    Townhouse,
    Condominium,
    SingleFamilyResidence,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [
        PropertyType::Townhouse,
        PropertyType::Condominium,
        PropertyType::SingleFamilyResidence,
    ];

    /// Wire and storage names, in declaration order
    pub const NAMES: &'static [&'static str] =
        &["Townhouse", "Condominium", "SingleFamilyResidence"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Townhouse => "Townhouse",
            Self::Condominium => "Condominium",
            Self::SingleFamilyResidence => "SingleFamilyResidence",
        }
    }

    /// Exact, case-sensitive match against the stored names
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// COMPARISON OPERATOR
// ============================================================================

/// Comparison operator for numeric listing filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = ">")]
    Gt,
}

impl CompareOp {
    pub const SYMBOLS: &'static [&'static str] = &["<", "<=", "=", ">=", ">"];

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Gt => ">",
        }
    }

    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            "=" => Some(Self::Eq),
            ">=" => Some(Self::Gte),
            ">" => Some(Self::Gt),
            _ => None,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}
