//! Offsets for ordered collections.
//!
//! A key is either an integer position or a string label. Dynamic offsets
//! arriving as JSON values are normalised the way an ordered hash map
//! normalises them: numeric strings collapse to integers, so `"3"` and `3`
//! address the same slot.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A scalar collection offset.
///
/// The representation is private so that a string key can never hold a
/// canonical integer: every constructor, including deserialization,
/// normalises.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Repr {
    Int(i64),
    Str(String),
}

impl Key {
    /// An integer offset.
    #[must_use]
    pub const fn int(i: i64) -> Self {
        Self(Repr::Int(i))
    }

    /// Normalises a dynamic offset.
    ///
    /// Fails with [`Error::InvalidInput`] for `null`, arrays and objects.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(Self::int(i64::from(*b))),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Self::int(i));
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                        Ok(Self::int(f.trunc() as i64))
                    }
                    _ => Err(Error::InvalidInput(format!("offset {n} is out of range"))),
                }
            }
            Value::String(s) => Ok(Self::from(s.as_str())),
            other => Err(Error::InvalidInput(format!(
                "offset must be an integer or string, {} given",
                type_name(other)
            ))),
        }
    }

    /// Returns the integer position, if this is an integer key.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match &self.0 {
            Repr::Int(i) => Some(*i),
            Repr::Str(_) => None,
        }
    }

    /// Returns the label, if this is a string key.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            Repr::Int(_) => None,
            Repr::Str(s) => Some(s),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Self::int(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        // Only canonical decimal integers collapse: "07" and "-0" stay strings.
        match s.parse::<i64>() {
            Ok(i) if i.to_string() == s => Self::int(i),
            _ => Self(Repr::Str(s.to_owned())),
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Int(i) => write!(f, "{i}"),
            Repr::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.0 {
            Repr::Int(i) => serializer.serialize_i64(*i),
            Repr::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(i64),
            Str(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Int(i) => Self::int(i),
            Wire::Str(s) => Self::from(s),
        })
    }
}
