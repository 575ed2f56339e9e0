//! Filter predicate definitions
//!
//! A predicate renders to a SQL fragment with `?` placeholders and pushes its
//! bound values into [`SqlParams`]. Column names are static identifiers and
//! operators come from [`CompareOp`], so no caller text reaches the query.

use crate::data::types::CompareOp;
use crate::utils::sql::escape_like_pattern;

/// Single predicate over a listings column
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive substring match
    ///
    /// `column` must hold text already lower-cased with `str::to_lowercase`;
    /// SQLite's own `lower()` only folds ASCII.
    Contains {
        column: &'static str,
        value: String,
    },
    /// Numeric comparison
    Number {
        column: &'static str,
        operator: CompareOp,
        value: f64,
    },
    /// Exact text equality
    Equals {
        column: &'static str,
        value: String,
    },
}

/// Value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
    Integer(i64),
    Null,
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn push_text(&mut self, value: impl Into<String>) {
        self.values.push(SqlValue::Text(value.into()));
    }

    pub fn push_real(&mut self, value: f64) {
        self.values.push(SqlValue::Real(value));
    }

    pub fn push_integer(&mut self, value: i64) {
        self.values.push(SqlValue::Integer(value));
    }
}

impl Filter {
    /// Generate SQL WHERE clause fragment
    /// Returns the SQL clause with ? placeholders and updates params
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Self::Contains { column, value } => {
                let needle = escape_like_pattern(&value.to_lowercase());
                params.push_text(format!("%{}%", needle));
                format!("{} LIKE ? ESCAPE '\\'", column)
            }
            Self::Number {
                column,
                operator,
                value,
            } => {
                params.push_real(*value);
                format!("{} {} ?", column, operator.as_sql())
            }
            Self::Equals { column, value } => {
                params.push_text(value.clone());
                format!("{} = ?", column)
            }
        }
    }
}
