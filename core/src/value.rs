//! Bound-value types and client-input casting.
//!
//! `Value` is the tagged parameter type flowing from conditions and entity
//! getters into the adapter. `in`/`nin` lists are carried as `Value::List`
//! until condition rendering expands them to one scalar per element, so an
//! adapter never receives a list parameter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single bound SQL parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// A list of scalar values, as produced for `in`/`nin` conditions.
    List(Vec<Value>),
}

impl Value {
    /// Returns true if this value is NULL.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value's shape matches the declared column kind.
    ///
    /// `Null` conforms to every kind; nullability is enforced where it
    /// matters, at condition rendering. Integers conform to `Float` columns
    /// since they widen losslessly.
    pub fn conforms_to(&self, kind: ValueKind) -> bool {
        match (self, kind) {
            (Value::Null, _) => true,
            (Value::Bool(_), ValueKind::Bool) => true,
            (Value::Int(_), ValueKind::Int) => true,
            (Value::Int(_), ValueKind::Float) => true,
            (Value::Float(_), ValueKind::Float) => true,
            (Value::Text(_), ValueKind::Text) => true,
            (Value::Uuid(_), ValueKind::Uuid) => true,
            (Value::Timestamp(_), ValueKind::Timestamp) => true,
            (Value::List(items), kind) => items.iter().all(|v| v.conforms_to(kind)),
            _ => false,
        }
    }

    /// Converts to the JSON representation used for row decoding and cache
    /// entries.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::from(s.as_str()),
            Value::Uuid(u) => serde_json::Value::from(u.to_string()),
            Value::Timestamp(ts) => serde_json::Value::from(ts.to_rfc3339()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Uuid(u) => write!(f, "'{}'", u),
            Value::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// ==================== conversions ====================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

// ==================== kinds ====================

/// The declared type of a column, governing default filter operations and
/// client-input casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Uuid,
    Timestamp,
}

impl ValueKind {
    /// Human-readable type name for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Uuid => "uuid",
            ValueKind::Timestamp => "timestamp",
        }
    }

    /// Casts one raw token from the filter grammar into a typed value.
    pub fn cast(&self, raw: &str) -> Result<Value> {
        let fail = || Error::Validation(format!("value `{}` is not a valid {}", raw, self.name()));
        match self {
            ValueKind::Bool => match raw {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
            ValueKind::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| fail()),
            ValueKind::Float => raw.parse::<f64>().map(Value::Float).map_err(|_| fail()),
            ValueKind::Text => Ok(Value::Text(raw.to_owned())),
            ValueKind::Uuid => Uuid::parse_str(raw).map(Value::Uuid).map_err(|_| fail()),
            ValueKind::Timestamp => DateTime::parse_from_rfc3339(raw)
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
                .map_err(|_| fail()),
        }
    }

    /// Casts a comma-separated list payload element-wise, as used by the
    /// `in`/`nin` grammar operations.
    pub fn cast_list(&self, raw: &str) -> Result<Value> {
        let items = raw
            .split(',')
            .map(|part| self.cast(part))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::List(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casts_by_kind() {
        assert_eq!(ValueKind::Bool.cast("true").unwrap(), Value::Bool(true));
        assert_eq!(ValueKind::Bool.cast("0").unwrap(), Value::Bool(false));
        assert_eq!(ValueKind::Int.cast("42").unwrap(), Value::Int(42));
        assert_eq!(ValueKind::Float.cast("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(
            ValueKind::Text.cast("hello").unwrap(),
            Value::Text("hello".into())
        );
        assert!(ValueKind::Int.cast("forty").is_err());
        assert!(ValueKind::Uuid.cast("not-a-uuid").is_err());
        assert!(ValueKind::Timestamp.cast("2024-13-99").is_err());
    }

    #[test]
    fn casts_timestamps_to_utc() {
        let ts = ValueKind::Timestamp.cast("2024-06-01T10:00:00+02:00").unwrap();
        match ts {
            Value::Timestamp(dt) => assert_eq!(dt.to_rfc3339(), "2024-06-01T08:00:00+00:00"),
            other => panic!("expected timestamp, got {other}"),
        }
    }

    #[test]
    fn casts_lists_element_wise() {
        let list = ValueKind::Int.cast_list("1,2,3").unwrap();
        assert_eq!(
            list,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert!(ValueKind::Int.cast_list("1,x,3").is_err());
    }

    #[test]
    fn conformance_follows_declared_kind() {
        assert!(Value::Int(1).conforms_to(ValueKind::Int));
        assert!(Value::Int(1).conforms_to(ValueKind::Float));
        assert!(Value::Null.conforms_to(ValueKind::Uuid));
        assert!(!Value::Text("x".into()).conforms_to(ValueKind::Int));
        let list = Value::List(vec![Value::Int(1), Value::Text("x".into())]);
        assert!(!list.conforms_to(ValueKind::Int));
    }

    #[test]
    fn option_and_vec_conversions() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::List(vec![Value::Text("a".into()), Value::Text("b".into())])
        );
    }
}
