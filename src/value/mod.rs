//! Structured values exchanged with the host.
//!
//! [`Value`] is deliberately narrow: it carries the shapes a schema's implied
//! type can produce plus the `Null` and `Unknown` markers, and offers object
//! projection ([`Value::as_value_map`]) and reconstruction ([`Value::object`]).
//! Turning bytes into values is the job of a [`ValueCodec`], so the wire
//! encoding can be swapped without touching the provider.

pub mod json;

use std::collections::BTreeMap;

use crate::error::ProviderError;
use crate::schema::AttributeType;

pub use json::JsonCodec;

/// A typed, nested value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A value of the given type that will only be known after apply.
    Unknown(AttributeType),
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// A list, set, or other homogeneous sequence.
    List(Vec<Value>),
    /// A fixed-length heterogeneous sequence.
    Tuple(Vec<Value>),
    /// An object or map, keyed by attribute name.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// A known string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// An unknown value of the given type.
    pub fn unknown(ty: AttributeType) -> Self {
        Self::Unknown(ty)
    }

    /// Rebuild an object from an attribute mapping.
    pub fn object(attrs: BTreeMap<String, Value>) -> Self {
        Self::Object(attrs)
    }

    /// Build a tuple.
    pub fn tuple(elements: Vec<Value>) -> Self {
        Self::Tuple(elements)
    }

    /// Whether this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value itself is known. Nested unknowns are not inspected.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Whether this value and everything nested inside it is known.
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Self::Unknown(_) => false,
            Self::List(items) | Self::Tuple(items) => items.iter().all(Value::is_wholly_known),
            Self::Object(attrs) => attrs.values().all(Value::is_wholly_known),
            _ => true,
        }
    }

    /// Project an object into a mutable attribute mapping.
    ///
    /// Null projects to an empty mapping. Any other non-object value is an
    /// error.
    pub fn as_value_map(&self) -> Result<BTreeMap<String, Value>, ProviderError> {
        match self {
            Self::Object(attrs) => Ok(attrs.clone()),
            Self::Null => Ok(BTreeMap::new()),
            other => Err(ProviderError::UnexpectedValue(format!(
                "expected object, got {}",
                other.type_name()
            ))),
        }
    }

    /// Look up an attribute of an object value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(attrs) => attrs.get(name),
            _ => None,
        }
    }

    /// Borrow the contents of a known string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unknown(_) => "unknown",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Object(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Untyped conversion: arrays become lists and objects become objects.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            },
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            },
        }
    }
}

/// Converts between raw bytes and [`Value`]s.
pub trait ValueCodec: Send + Sync + 'static {
    /// Decode `raw` into a value conforming to `ty`.
    fn unmarshal(&self, raw: &[u8], ty: &AttributeType) -> Result<Value, ProviderError>;

    /// Encode a wholly known value.
    fn marshal(&self, value: &Value) -> Result<Vec<u8>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_map_projection() {
        let value = Value::from(json!({"id": "a", "value": "b"}));
        let mut attrs = value.as_value_map().unwrap();
        assert_eq!(attrs.len(), 2);

        attrs.insert("extra".to_string(), Value::string("c"));
        let rebuilt = Value::object(attrs);
        assert_eq!(rebuilt.get("extra"), Some(&Value::string("c")));
        assert_eq!(rebuilt.get("id").and_then(Value::as_str), Some("a"));
        // the source value is untouched
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn test_null_projects_to_empty_map() {
        assert!(Value::Null.as_value_map().unwrap().is_empty());
    }

    #[test]
    fn test_non_object_projection_fails() {
        let err = Value::string("nope").as_value_map().unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedValue(msg) if msg.contains("string")));
    }

    #[test]
    fn test_known_markers() {
        let unknown = Value::unknown(AttributeType::String);
        assert!(!unknown.is_known());
        assert!(!unknown.is_null());

        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), unknown);
        let obj = Value::object(attrs);
        assert!(obj.is_known());
        assert!(!obj.is_wholly_known());

        assert!(Value::from(json!({"a": [1, 2, {"b": null}]})).is_wholly_known());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(true)), Value::Bool(true));
        assert_eq!(Value::from(json!("x")), Value::string("x"));
        assert_eq!(
            Value::from(json!(["x"])),
            Value::List(vec![Value::string("x")])
        );
    }
}
