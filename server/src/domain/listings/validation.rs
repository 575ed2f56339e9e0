//! Declarative validation rules for listing input
//!
//! Every rule lives in [`RULES`], keyed by field and [`RuleSet`]. A rule has a
//! presence policy (when the field is evaluated at all) and an ordered list of
//! checks. Evaluation of a field stops at its first failing check; fields are
//! reported in table order.
//!
//! Comparison operands use [`Presence::RequiredWith`], which ties their
//! requiredness to whether the paired value was supplied.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::data::types::{CompareOp, PropertyType};

// ============================================================================
// Fields and values
// ============================================================================

/// Named rule collection applied to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    Create,
    Update,
    Filter,
}

impl RuleSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Filter => "filter",
        }
    }
}

/// Validated field, named as on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Address,
    Price,
    PriceOperand,
    Bedrooms,
    BedroomsOperand,
    Bathrooms,
    BathroomsOperand,
    Category,
    Page,
    PageSize,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Price => "price",
            Self::PriceOperand => "priceOperand",
            Self::Bedrooms => "bedrooms",
            Self::BedroomsOperand => "bedroomsOperand",
            Self::Bathrooms => "bathrooms",
            Self::BathroomsOperand => "bathroomsOperand",
            Self::Category => "type",
            Self::Page => "page",
            Self::PageSize => "pageSize",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw value of one field as the candidate supplied it
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Null,
    Text(String),
    Number(f64),
    /// Booleans, arrays and objects
    Other,
}

impl FieldValue {
    /// Map a JSON body value without coercion
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        use serde_json::Value;
        match value {
            None => Self::Absent,
            Some(Value::Null) => Self::Null,
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Other, Self::Number),
            Some(_) => Self::Other,
        }
    }

    /// Query parameter taken as text
    pub fn from_query_text(raw: Option<&str>) -> Self {
        raw.map_or(Self::Absent, |s| Self::Text(s.to_string()))
    }

    /// Query parameter coerced to a number when it parses as a finite one
    pub fn from_query_number(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Absent,
            Some(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() && !s.trim().is_empty() => Self::Number(n),
                _ => Self::Text(s.to_string()),
            },
        }
    }

    /// Absent, null or whitespace-only text
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Absent | Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Anything the rule table can be evaluated against
pub trait Candidate {
    fn value(&self, field: Field) -> FieldValue;
}

// ============================================================================
// Violations
// ============================================================================

/// Kind of constraint a violation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Required,
    String,
    Numeric,
    Integer,
    Minimum,
    Maximum,
    Membership,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::Integer => "integer",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::Membership => "membership",
        }
    }
}

/// One failed constraint on one field
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Violation {
    /// Wire name of the field
    #[schema(example = "priceOperand")]
    pub field: String,
    pub constraint: ConstraintKind,
    #[schema(example = "priceOperand is required when price is supplied")]
    pub message: String,
}

impl Violation {
    fn from_error(field: Field, constraint: ConstraintKind, error: ValidationError) -> Self {
        let message = error
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{} failed {} check", field, constraint.as_str()));
        Self {
            field: field.as_str().to_string(),
            constraint,
            message,
        }
    }
}

/// Ordered list of violations; never empty when returned as an error
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn single(field: Field, constraint: ConstraintKind, message: impl Into<String>) -> Self {
        Self(vec![Violation {
            field: field.as_str().to_string(),
            constraint,
            message: message.into(),
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }

    /// Whether `field` has a violation of the given kind
    pub fn contains(&self, field: Field, constraint: ConstraintKind) -> bool {
        self.0
            .iter()
            .any(|v| v.field == field.as_str() && v.constraint == constraint)
    }

    fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.iter().map(|v| v.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

// ============================================================================
// Rule table
// ============================================================================

/// When a rule's checks run
#[derive(Debug, Clone, Copy)]
pub enum Presence {
    /// Missing (absent, null, blank) is a `required` violation
    Required,
    /// Skipped when absent; null still runs the checks
    Optional,
    /// Skipped when absent or null
    Nullable,
    /// Skipped while the sibling is absent, otherwise `Required`
    RequiredWith(Field),
}

/// Single constraint check
#[derive(Debug, Clone, Copy)]
pub enum Check {
    Text,
    NotBlank,
    Numeric,
    Integer,
    Min(f64),
    Max(f64),
    OneOf(&'static [&'static str]),
    /// Upper bound taken from [`ValidationContext::max_page_size`]
    PageSizeLimit,
}

impl Check {
    fn kind(&self) -> ConstraintKind {
        match self {
            Self::Text => ConstraintKind::String,
            Self::NotBlank => ConstraintKind::Required,
            Self::Numeric => ConstraintKind::Numeric,
            Self::Integer => ConstraintKind::Integer,
            Self::Min(_) => ConstraintKind::Minimum,
            Self::Max(_) => ConstraintKind::Maximum,
            Self::OneOf(_) => ConstraintKind::Membership,
            Self::PageSizeLimit => ConstraintKind::Maximum,
        }
    }

    fn run(
        &self,
        field: Field,
        value: &FieldValue,
        ctx: &ValidationContext,
    ) -> Result<(), ValidationError> {
        let fail = |code: &'static str, message: String| {
            Err(ValidationError::new(code).with_message(message.into()))
        };

        match *self {
            Self::Text => match value {
                FieldValue::Text(_) => Ok(()),
                _ => fail("string", format!("{} must be a string", field)),
            },
            Self::NotBlank => match value {
                FieldValue::Text(s) if s.trim().is_empty() => {
                    fail("required", format!("{} should not be empty", field))
                }
                _ => Ok(()),
            },
            Self::Numeric => match value {
                FieldValue::Number(n) if n.is_finite() => Ok(()),
                _ => fail("numeric", format!("{} must be a number", field)),
            },
            Self::Integer => match value.as_number() {
                Some(n) if n.fract() != 0.0 => {
                    fail("integer", format!("{} must be an integer", field))
                }
                _ => Ok(()),
            },
            Self::Min(min) => match value.as_number() {
                Some(n) if n < min => fail(
                    "minimum",
                    format!("{} must not be less than {}", field, min),
                ),
                _ => Ok(()),
            },
            Self::Max(max) => match value.as_number() {
                Some(n) if n > max => fail(
                    "maximum",
                    format!("{} must not be greater than {}", field, max),
                ),
                _ => Ok(()),
            },
            Self::OneOf(allowed) => match value.as_text() {
                Some(s) if allowed.contains(&s) => Ok(()),
                _ => fail(
                    "membership",
                    format!(
                        "{} must be one of the following values: {}",
                        field,
                        allowed.join(", ")
                    ),
                ),
            },
            Self::PageSizeLimit => match (value.as_number(), ctx.max_page_size) {
                (Some(n), Some(max)) if n > max as f64 => fail(
                    "maximum",
                    format!("{} must not be greater than {}", field, max),
                ),
                _ => Ok(()),
            },
        }
    }
}

/// One row of the rule table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: Field,
    pub rule_set: RuleSet,
    pub presence: Presence,
    pub checks: &'static [Check],
}

const fn rule(
    rule_set: RuleSet,
    field: Field,
    presence: Presence,
    checks: &'static [Check],
) -> Rule {
    Rule {
        field,
        rule_set,
        presence,
        checks,
    }
}

const CATEGORY_NAMES: &[&str] = PropertyType::NAMES;
const OPERATORS: &[&str] = CompareOp::SYMBOLS;

const ADDRESS: &[Check] = &[Check::Text, Check::NotBlank];
const AMOUNT: &[Check] = &[Check::Numeric, Check::Min(0.0)];
/// Largest integer an f64 holds exactly
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const COUNT: &[Check] = &[
    Check::Numeric,
    Check::Integer,
    Check::Min(0.0),
    Check::Max(MAX_SAFE_INTEGER),
];
const CATEGORY: &[Check] = &[Check::OneOf(CATEGORY_NAMES)];
const OPERAND: &[Check] = &[Check::OneOf(OPERATORS)];
const PAGE: &[Check] = &[Check::Numeric, Check::Integer, Check::Min(1.0)];
const PAGE_SIZE: &[Check] = &[
    Check::Numeric,
    Check::Integer,
    Check::Min(1.0),
    Check::PageSizeLimit,
];

/// The complete rule table
pub static RULES: &[Rule] = &[
    // create
    rule(RuleSet::Create, Field::Address, Presence::Required, ADDRESS),
    rule(RuleSet::Create, Field::Price, Presence::Required, AMOUNT),
    rule(RuleSet::Create, Field::Bedrooms, Presence::Required, COUNT),
    rule(RuleSet::Create, Field::Bathrooms, Presence::Required, COUNT),
    rule(RuleSet::Create, Field::Category, Presence::Nullable, CATEGORY),
    // update
    rule(RuleSet::Update, Field::Address, Presence::Optional, ADDRESS),
    rule(RuleSet::Update, Field::Price, Presence::Optional, AMOUNT),
    rule(RuleSet::Update, Field::Bedrooms, Presence::Optional, COUNT),
    rule(RuleSet::Update, Field::Bathrooms, Presence::Optional, COUNT),
    rule(RuleSet::Update, Field::Category, Presence::Nullable, CATEGORY),
    // filter
    rule(RuleSet::Filter, Field::Address, Presence::Optional, &[Check::Text]),
    rule(RuleSet::Filter, Field::Price, Presence::Optional, AMOUNT),
    rule(
        RuleSet::Filter,
        Field::PriceOperand,
        Presence::RequiredWith(Field::Price),
        OPERAND,
    ),
    rule(RuleSet::Filter, Field::Bedrooms, Presence::Optional, AMOUNT),
    rule(
        RuleSet::Filter,
        Field::BedroomsOperand,
        Presence::RequiredWith(Field::Bedrooms),
        OPERAND,
    ),
    rule(RuleSet::Filter, Field::Bathrooms, Presence::Optional, AMOUNT),
    rule(
        RuleSet::Filter,
        Field::BathroomsOperand,
        Presence::RequiredWith(Field::Bathrooms),
        OPERAND,
    ),
    rule(RuleSet::Filter, Field::Category, Presence::Optional, CATEGORY),
    rule(RuleSet::Filter, Field::Page, Presence::Optional, PAGE),
    rule(RuleSet::Filter, Field::PageSize, Presence::Optional, PAGE_SIZE),
];

// ============================================================================
// Evaluation
// ============================================================================

/// Runtime settings some checks depend on
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext {
    pub max_page_size: Option<u64>,
}

/// Evaluate every rule of `rule_set` against `candidate`
pub fn validate<C: Candidate + ?Sized>(
    candidate: &C,
    rule_set: RuleSet,
    ctx: &ValidationContext,
) -> Result<(), Violations> {
    let mut violations = Violations::default();

    for rule in RULES.iter().filter(|r| r.rule_set == rule_set) {
        let value = candidate.value(rule.field);

        let required = match rule.presence {
            Presence::Required => true,
            Presence::Optional if value == FieldValue::Absent => continue,
            Presence::Optional => false,
            Presence::Nullable if matches!(value, FieldValue::Absent | FieldValue::Null) => {
                continue;
            }
            Presence::Nullable => false,
            Presence::RequiredWith(sibling) => {
                if candidate.value(sibling) == FieldValue::Absent {
                    continue;
                }
                true
            }
        };

        if required && value.is_missing() {
            let message = match rule.presence {
                Presence::RequiredWith(sibling) => {
                    format!("{} is required when {} is supplied", rule.field, sibling)
                }
                _ => format!("{} is required", rule.field),
            };
            violations.push(Violation {
                field: rule.field.as_str().to_string(),
                constraint: ConstraintKind::Required,
                message,
            });
            continue;
        }

        for check in rule.checks {
            if let Err(error) = check.run(rule.field, &value, ctx) {
                violations.push(Violation::from_error(rule.field, check.kind(), error));
                break;
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(
            rule_set = rule_set.as_str(),
            count = violations.len(),
            "Validation failed"
        );
        Err(violations)
    }
}
