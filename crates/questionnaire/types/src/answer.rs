//! Typed answer values and the per-type validity rule
//!
//! Values serialize in FHIR `value[x]` form, e.g. `{"valueDecimal": 1.5}`.

use crate::{Item, ItemType, QuestionnaireError, QuestionnaireResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single typed answer value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnswerValue {
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
    #[serde(rename = "valueDecimal")]
    Decimal(f64),
    #[serde(rename = "valueInteger")]
    Integer(i64),
    #[serde(rename = "valueDate")]
    Date(NaiveDate),
    #[serde(rename = "valueDateTime")]
    DateTime(DateTime<Utc>),
    #[serde(rename = "valueTime")]
    Time(NaiveTime),
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueCoding")]
    Coding(String),
}

impl AnswerValue {
    /// Short name of the value kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Decimal(_) => "decimal",
            Self::Integer(_) => "integer",
            Self::Date(_) => "date",
            Self::DateTime(_) => "dateTime",
            Self::Time(_) => "time",
            Self::String(_) => "string",
            Self::Coding(_) => "coding",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Decimal(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Whether ordering comparisons (`<`, `>=`, ...) are meaningful
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            Self::Decimal(_) | Self::Integer(_) | Self::Date(_) | Self::DateTime(_) | Self::Time(_)
        )
    }

    /// Compare two values of compatible kinds.
    ///
    /// Decimal and integer compare numerically with zero tolerance.
    /// Returns `None` for incomparable kinds (and NaN).
    pub fn compare(&self, other: &AnswerValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Decimal(_) | Self::Integer(_), Self::Decimal(_) | Self::Integer(_)) => {
                self.as_number()?.partial_cmp(&other.as_number()?)
            }
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) | (Self::Coding(a), Self::Coding(b)) => {
                Some(a.cmp(b))
            }
            _ => None,
        }
    }

    /// The type-specific validity rule.
    ///
    /// A value is valid for an item when the item's type accepts its kind
    /// and the value itself is meaningful: non-blank text within
    /// `max_length`, a finite decimal, a non-empty code.
    pub fn is_valid_for(&self, item: &Item) -> bool {
        if !item.item_type.accepts(self) {
            return false;
        }
        match self {
            Self::Decimal(v) => v.is_finite(),
            Self::String(s) => {
                !s.trim().is_empty()
                    && item
                        .max_length
                        .map_or(true, |max| s.chars().count() <= max)
            }
            Self::Coding(code) => !code.trim().is_empty(),
            _ => true,
        }
    }

    /// Read raw widget input as a value for the given item type.
    ///
    /// Decimals accept `,` as the decimal separator. Dates accept ISO
    /// (`2021-03-01`) and dotted (`01.03.2021`) forms.
    pub fn parse(item_type: ItemType, input: &str) -> QuestionnaireResult<AnswerValue> {
        let trimmed = input.trim();
        let invalid = || QuestionnaireError::InvalidInput {
            item_type,
            input: input.to_string(),
        };

        let value = match item_type {
            ItemType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Self::Boolean(true),
                "false" | "no" | "0" => Self::Boolean(false),
                _ => return Err(invalid()),
            },
            ItemType::Decimal => {
                let parsed: f64 = trimmed.replace(',', ".").parse().map_err(|_| invalid())?;
                if !parsed.is_finite() {
                    return Err(invalid());
                }
                Self::Decimal(parsed)
            }
            ItemType::Integer => Self::Integer(trimmed.parse().map_err(|_| invalid())?),
            ItemType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
                .map(Self::Date)
                .map_err(|_| invalid())?,
            ItemType::DateTime => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| Self::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| invalid())?,
            ItemType::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                .map(Self::Time)
                .map_err(|_| invalid())?,
            ItemType::String | ItemType::Text | ItemType::OpenChoice => {
                Self::String(input.to_string())
            }
            ItemType::Choice => Self::Coding(trimmed.to_string()),
            ItemType::Group | ItemType::Display => return Err(invalid()),
        };
        Ok(value)
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Date(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Time(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "\"{}\"", v),
            Self::Coding(v) => write!(f, "#{}", v),
        }
    }
}
