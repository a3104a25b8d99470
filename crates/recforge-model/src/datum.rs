//! Input values for record construction
//!
//! A [`Datum`] is what a caller hands in for one field: a single value, a
//! sequence with one value per unit, a ragged sequence-of-sequences with one
//! inner sequence per group, or nothing at all.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One caller-supplied field value
///
/// JSON arrays always become [`Datum::Seq`]; every other JSON value,
/// including `null` and objects, is a leaf. [`Datum::Undefined`] has no JSON
/// spelling and marks a value that was never set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Datum {
    /// Value was never provided
    #[default]
    Undefined,

    /// A non-sequence value (may be `null` or a mapping)
    Value(Value),

    /// An ordered sequence of further data
    Seq(Vec<Datum>),
}

impl Datum {
    /// Explicit `null`
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Build a sequence from anything convertible into data
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Datum>,
    {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Non-empty sequence whose elements are all sequences
    #[must_use]
    pub fn is_ragged(&self) -> bool {
        match self {
            Self::Seq(items) => !items.is_empty() && items.iter().all(Self::is_seq),
            _ => false,
        }
    }

    /// Sequence elements, if this is a sequence
    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&[Datum]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Outer length: element count for sequences, 1 for leaves, 0 when undefined
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Undefined => 0,
            Self::Value(_) => 1,
            Self::Seq(items) => items.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert into a plain JSON value
    ///
    /// Undefined data become `null`; sequences become arrays.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Undefined => Value::Null,
            Self::Value(value) => value,
            Self::Seq(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
        }
    }
}

impl From<Value> for Datum {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Seq(items.into_iter().map(Self::from).collect()),
            other => Self::Value(other),
        }
    }
}

impl From<Datum> for Value {
    fn from(datum: Datum) -> Self {
        datum.into_value()
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    /// `None` is undefined, not null
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}
