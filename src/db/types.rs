//! Row and value types for rangeview.
//!
//! Query results are passed through as row objects: ordered mappings from
//! column name to a scalar or null value.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Represents a single scalar value read from or bound to SQLite.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Signed integer.
    Integer(i64),

    /// Floating point number.
    Real(f64),

    /// Text value.
    Text(String),

    /// Binary data.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Parses a command-line parameter into a value.
    ///
    /// `null` (any case) becomes NULL, integers and floats become numbers,
    /// anything else is text.
    pub fn parse_param(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("null") {
            return Value::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Value::Real(f);
            }
        }
        Value::Text(raw.to_string())
    }

    /// Attempts to convert the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Blob(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            // JSON has no NaN/Infinity
            Value::Real(f) if !f.is_finite() => serializer.serialize_unit(),
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(b) => b.serialize(serializer),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// One result row: column names in declaration order, each mapped to a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value.
    ///
    /// A repeated column name keeps its first position and takes the new value,
    /// so names stay unique within the row.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Builder-style variant of [`Row::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Looks up a column by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "NULL");
        assert_eq!(Value::Integer(42).to_display_string(), "42");
        assert_eq!(Value::Real(2.5).to_display_string(), "2.5");
        assert_eq!(Value::Text("hello".to_string()).to_display_string(), "hello");
        assert_eq!(Value::Blob(vec![1, 2, 3]).to_display_string(), "<3 bytes>");
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42i64), Value::Integer(42));
        assert_eq!(Value::from(2.5f64), Value::Real(2.5));
        assert_eq!(Value::from("hello"), Value::Text("hello".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Integer(7));
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(Value::parse_param("NULL"), Value::Null);
        assert_eq!(Value::parse_param("-12"), Value::Integer(-12));
        assert_eq!(Value::parse_param("1.5"), Value::Real(1.5));
        assert_eq!(Value::parse_param("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::parse_param("Tetris"), Value::Text("Tetris".to_string()));
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row = Row::new()
            .with("title", "Zork")
            .with("id", 1)
            .with("rating", None::<f64>);

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"title":"Zork","id":1,"rating":null}"#);
    }

    #[test]
    fn test_row_duplicate_column_keeps_position_takes_last_value() {
        let row = Row::new().with("a", 1).with("b", 2).with("a", 3);

        assert_eq!(row.len(), 2);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_blob_and_non_finite_serialization() {
        let row = Row::new()
            .with("bytes", vec![1u8, 255])
            .with("nan", f64::NAN);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"bytes":[1,255],"nan":null}"#);
    }
}
