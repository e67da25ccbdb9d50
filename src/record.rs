//! Record access for field encoding.
//!
//! Fields never see concrete record types. They read attribute values by name
//! through the [`Record`] trait, which turns a struct field into a
//! [`ScalarValue`].
//!
//! # Example
//!
//! ```rust
//! use matricize::{Record, ScalarValue};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Record for Person {
//!     fn attribute(&self, name: &str) -> Option<ScalarValue> {
//!         match name {
//!             "name" => Some(self.name.as_str().into()),
//!             "age" => Some(self.age.into()),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Scalar value read from a record attribute.
///
/// Equality and hashing are total: floats compare by bit pattern, so a
/// `ScalarValue` can be used as a category key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Numeric interpretation of the value.
    ///
    /// `Null` maps to NaN and booleans to 0/1. Strings have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Null => Some(f64::NAN),
            ScalarValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ScalarValue::Int(i) => Some(*i as f64),
            ScalarValue::Float(f) => Some(*f),
            ScalarValue::String(_) => None,
        }
    }

    /// Truthiness: null, false, zero and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ScalarValue::Null => false,
            ScalarValue::Bool(b) => *b,
            ScalarValue::Int(i) => *i != 0,
            ScalarValue::Float(f) => *f != 0.0,
            ScalarValue::String(s) => !s.is_empty(),
        }
    }

    /// Convert to a plain string representation.
    pub fn to_atom(&self) -> String {
        match self {
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Null => "null".to_string(),
        }
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScalarValue::Null, ScalarValue::Null) => true,
            (ScalarValue::Bool(a), ScalarValue::Bool(b)) => a == b,
            (ScalarValue::Int(a), ScalarValue::Int(b)) => a == b,
            (ScalarValue::Float(a), ScalarValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ScalarValue::String(a), ScalarValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ScalarValue::Null => {}
            ScalarValue::Bool(b) => b.hash(state),
            ScalarValue::Int(i) => i.hash(state),
            ScalarValue::Float(f) => f.to_bits().hash(state),
            ScalarValue::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "'{}'", s),
            other => f.write_str(&other.to_atom()),
        }
    }
}

// =============================================================================
// Conversions from Rust primitives
// =============================================================================

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(value as i64)
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::Int(value as i64)
    }
}

impl From<u16> for ScalarValue {
    fn from(value: u16) -> Self {
        ScalarValue::Int(value as i64)
    }
}

impl From<usize> for ScalarValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(ScalarValue::Float(value as f64), ScalarValue::Int)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<f32> for ScalarValue {
    fn from(value: f32) -> Self {
        ScalarValue::Float(value as f64)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<&String> for ScalarValue {
    fn from(value: &String) -> Self {
        ScalarValue::String(value.clone())
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

// =============================================================================
// Record
// =============================================================================

/// A structured data item whose attributes can be read by name.
///
/// Return `None` for names the record does not have; fields treat that as a
/// missing attribute.
pub trait Record {
    /// Read the scalar value of the named attribute.
    fn attribute(&self, name: &str) -> Option<ScalarValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        (**self).attribute(name)
    }
}

impl Record for HashMap<String, ScalarValue> {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        self.get(name).cloned()
    }
}

impl Record for BTreeMap<String, ScalarValue> {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        self.get(name).cloned()
    }
}

/// JSON objects are records; nested arrays and objects are not scalar attributes.
impl Record for serde_json::Value {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        match self.get(name)? {
            serde_json::Value::Null => Some(ScalarValue::Null),
            serde_json::Value::Bool(b) => Some(ScalarValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ScalarValue::Int(i))
                } else {
                    n.as_f64().map(ScalarValue::Float)
                }
            }
            serde_json::Value::String(s) => Some(ScalarValue::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}
