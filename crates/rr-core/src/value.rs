//! Tagged cell values and their comparison rules.
//!
//! Every value an engine returns, and every golden value a fixture declares,
//! is normalized into [`Value`]. Equality is defined once here:
//!
//! - `Null` and the empty sentinel `Empty` are interchangeable.
//! - `Int` and `Float` compare by decoded numeric value.
//! - `Text` compares equal to a number when the text decodes to that number.
//! - `NaN` equals `NaN`, so a captured output always equals itself.
//!
//! [`Value::strict_eq`] is the type-exact alternative for statements that
//! disable normalization.

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single result row
pub type Row = Vec<Value>;

/// A single normalized cell value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// The harness placeholder for "no value"; equal to `Null`
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether this is `Null` or the `Empty` sentinel
    pub fn is_null_like(&self) -> bool {
        matches!(self, Value::Null | Value::Empty)
    }

    /// Type-exact equality for statements that opt out of normalization.
    ///
    /// Both values must carry the same tag; `Int(1)` and `Float(1.0)` differ,
    /// as do `Text("1")` and `Int(1)`. `Null` and `Empty` remain
    /// interchangeable and `NaN` still equals `NaN`.
    pub fn strict_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (a, b) if a.is_null_like() || b.is_null_like() => {
                a.is_null_like() && b.is_null_like()
            }
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => floats_equal(*a, *b),
            (Text(a), Text(b)) => a == b,
            _ => false,
        }
    }

    /// Short type label used in mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Empty => "empty",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

fn floats_equal(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// Exact: the float must be integral and hold the same integer, so large
/// integers are never rounded through `f64` into a false match.
fn int_float_equal(i: i64, f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && i == f as i64
}

fn text_numeric_equal(text: &str, number: &Value) -> bool {
    let trimmed = text.trim();
    match number {
        Value::Int(i) => match trimmed.parse::<i64>() {
            Ok(parsed) => parsed == *i,
            Err(_) => trimmed
                .parse::<f64>()
                .is_ok_and(|parsed| int_float_equal(*i, parsed)),
        },
        Value::Float(f) => trimmed
            .parse::<f64>()
            .is_ok_and(|parsed| floats_equal(parsed, *f)),
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        if self.is_null_like() || other.is_null_like() {
            return self.is_null_like() && other.is_null_like();
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => floats_equal(*a, *b),
            (Int(i), Float(f)) | (Float(f), Int(i)) => int_float_equal(*i, *f),
            (Text(a), Text(b)) => a == b,
            (Text(t), n @ (Int(_) | Float(_))) | (n @ (Int(_) | Float(_)), Text(t)) => {
                text_numeric_equal(t, n)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Empty => f.write_str("<empty>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Build a row from a list of values: `row![1, "a", Value::Null]`
#[macro_export]
macro_rules! row {
    ($($v:expr),* $(,)?) => {
        vec![$($crate::value::Value::from($v)),*]
    };
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Empty => serializer.collect_seq(std::iter::empty::<()>()),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            // JSON has no NaN/Infinity; keep them as text, which still compares equal
            Value::Float(x) if !x.is_finite() => serializer.serialize_str(&x.to_string()),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, [], a boolean, a number, or a string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(
                "only an empty sequence `[]` is allowed as a cell value",
            ));
        }
        Ok(Value::Empty)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
