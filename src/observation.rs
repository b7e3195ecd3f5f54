//! Input data model: dimension values, observations, and dimension metadata.
//!
//! An upstream query/aggregation layer produces rows of the form
//! `(count, values)` — one aggregated group-by row per observation, where
//! `values` holds one entry per grouped dimension. This module defines those
//! types and the numeric coercions the clustering pipeline relies on.
//!
//! All numeric input is held as `f64`. Aggregators that produce
//! arbitrary-precision decimals must convert at this boundary (the provided
//! `From` impls cover the common integer and float widths); the pipeline
//! never operates on non-floating numeric representations.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single dimension value within an observation.
///
/// Serializes untagged, so a row looks exactly like its JSON wire form:
/// `null`, a number, or a string. Integral numbers serialize without a
/// fractional part, matching what the upstream aggregator produced.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A null-valued group. Only present when the aggregator included them.
    Null,
    /// A numeric value, coerced to `f64` at the boundary.
    Number(f64),
    /// A categorical (enumerable) value.
    Label(String),
}

impl Value {
    /// The numeric content of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Total ordering across variants: `Null < Number < Label`.
    ///
    /// Numbers compare via [`f64::total_cmp`], labels lexicographically.
    /// Used by the ordering policy to sort value tuples deterministically.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Number(_), Value::Label(_)) => Ordering::Less,
            (Value::Label(_), Value::Number(_)) => Ordering::Greater,
            (Value::Label(a), Value::Label(b)) => a.cmp(b),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Number(x) => {
                // Aggregators hand over integer-valued groups; keep them
                // integral on the wire rather than widening to `15000.0`.
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*x as i64)
                } else {
                    serializer.serialize_f64(*x)
                }
            }
            Value::Label(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Number(f64::from(x))
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Number(f64::from(x))
    }
}

impl From<u32> for Value {
    fn from(x: u32) -> Self {
        Value::Number(f64::from(x))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Label(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Label(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// One aggregated group-by row: a dimension-value vector plus an occurrence
/// count.
///
/// Observations are built fresh per request, immutable once built, and never
/// persisted. Serializes as `{"count": <int>, "values": [..]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Aggregate frequency weight of this group.
    pub count: u64,
    /// One value per grouped dimension.
    pub values: Vec<Value>,
}

impl Observation {
    /// Create an observation from a count and its dimension values.
    pub fn new(count: u64, values: Vec<Value>) -> Self {
        Self { count, values }
    }

    /// The observation's values as a raw `f64` vector.
    ///
    /// Returns `None` if any value is non-numeric (a label or a null); such
    /// observations cannot enter distance computations.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        self.values.iter().map(Value::as_f64).collect()
    }
}

/// Per-dimension metadata supplied by the aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Whether the dimension is categorical (a bounded, nameable value set).
    ///
    /// Enumerable dimensions change the sort policy and disable clustering.
    pub enumerable: bool,
}

impl Dimension {
    /// A numeric dimension.
    pub fn numeric() -> Self {
        Self { enumerable: false }
    }

    /// A categorical (enumerable) dimension.
    pub fn enumerable() -> Self {
        Self { enumerable: true }
    }
}
