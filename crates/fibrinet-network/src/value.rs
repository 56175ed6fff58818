//! Scalar attribute values and safe type coercion
//!
//! Every node, edge and metadata attribute is a [`Scalar`]. Schemas declare
//! a [`ScalarType`] per attribute and writes go through [`Scalar::coerce`].

use crate::error::{NetworkError, NetworkResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Texts that coerce to `true` (compared trimmed and lowercased)
const TRUTHY: [&str; 3] = ["true", "1", "yes"];
/// 2^63, exclusive bound of floats that fit in `i64`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Declared type of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Boolean
    Bool,
    /// Free text
    Text,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// Absent / null value
    #[default]
    Null,
}

impl Scalar {
    /// Cast this value to `ty`.
    ///
    /// `Null` passes through unchanged for every type. Booleans are
    /// special-cased: only the texts `true`, `1` and `yes` (case-insensitive)
    /// coerce to `true`, everything else to `false`. Floats become integers
    /// only when integral and within `i64` range.
    ///
    /// # Errors
    /// Returns [`NetworkError::TypeCoercion`] when the value has no
    /// representation in `ty`.
    pub fn coerce(&self, ty: ScalarType, attribute: &str) -> NetworkResult<Scalar> {
        let fail = || NetworkError::TypeCoercion {
            attribute: attribute.to_string(),
            expected: ty,
            value: self.clone(),
        };

        if self.is_null() {
            return Ok(Scalar::Null);
        }

        let coerced = match (ty, self) {
            (ScalarType::Bool, Scalar::Bool(b)) => Scalar::Bool(*b),
            (ScalarType::Bool, other) => {
                let text = other.to_plain_string();
                let text = text.trim().to_lowercase();
                Scalar::Bool(TRUTHY.contains(&text.as_str()))
            }

            (ScalarType::Int, Scalar::Int(i)) => Scalar::Int(*i),
            (ScalarType::Int, Scalar::Bool(b)) => Scalar::Int(i64::from(*b)),
            (ScalarType::Int, Scalar::Float(f)) => {
                if f.fract() != 0.0 || !(-I64_BOUND..I64_BOUND).contains(f) {
                    return Err(fail());
                }
                #[allow(clippy::cast_possible_truncation)]
                let exact = *f as i64;
                Scalar::Int(exact)
            }
            (ScalarType::Int, Scalar::Text(s)) => {
                Scalar::Int(s.trim().parse::<i64>().map_err(|_| fail())?)
            }

            (ScalarType::Float, Scalar::Float(f)) => Scalar::Float(*f),
            #[allow(clippy::cast_precision_loss)]
            (ScalarType::Float, Scalar::Int(i)) => Scalar::Float(*i as f64),
            (ScalarType::Float, Scalar::Bool(b)) => Scalar::Float(f64::from(u8::from(*b))),
            (ScalarType::Float, Scalar::Text(s)) => {
                Scalar::Float(s.trim().parse::<f64>().map_err(|_| fail())?)
            }

            (ScalarType::Text, other) => Scalar::Text(other.to_plain_string()),

            (_, Scalar::Null) => Scalar::Null,
        };

        Ok(coerced)
    }

    /// Whether the value is `Null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view (only for `Int`)
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view (`Int` or `Float`)
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean view (only for `Bool`)
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view (only for `Text`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Unquoted textual form used by text and bool coercion
    fn to_plain_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Null => String::new(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Null => f.write_str("null"),
            other => f.write_str(&other.to_plain_string()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
