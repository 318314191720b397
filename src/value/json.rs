//! JSON encoding of structured values.
//!
//! Decoding is type-directed: the raw JSON is walked alongside the implied
//! type of a schema and every mismatch is reported with the attribute path
//! where it occurred.
//!
//! ```
//! use hemmer_provider_simple::schema::{Attribute, Schema};
//! use hemmer_provider_simple::value::{JsonCodec, Value, ValueCodec};
//!
//! let schema = Schema::v0()
//!     .with_attribute("id", Attribute::computed_string())
//!     .with_attribute("value", Attribute::optional_string());
//!
//! let value = JsonCodec
//!     .unmarshal(br#"{"id":"a"}"#, &schema.implied_type())
//!     .unwrap();
//! assert_eq!(value.get("id"), Some(&Value::string("a")));
//! assert_eq!(value.get("value"), Some(&Value::Null));
//! ```

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::error::ProviderError;
use crate::schema::AttributeType;
use crate::value::{Value, ValueCodec};

/// The JSON [`ValueCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn unmarshal(&self, raw: &[u8], ty: &AttributeType) -> Result<Value, ProviderError> {
        let json: Json = serde_json::from_slice(raw)?;
        decode(&json, ty, "")
    }

    fn marshal(&self, value: &Value) -> Result<Vec<u8>, ProviderError> {
        let json = encode(value, "")?;
        Ok(serde_json::to_vec(&json)?)
    }
}

fn decode(json: &Json, ty: &AttributeType, path: &str) -> Result<Value, ProviderError> {
    if json.is_null() {
        return Ok(Value::Null);
    }

    match ty {
        // primitive types accept each other's JSON forms
        AttributeType::String => match json {
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Number(n) => Ok(Value::String(n.to_string())),
            Json::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(type_error(path, ty, json)),
        },
        AttributeType::Int64 => match json {
            Json::Number(n) if is_int64(json) => Ok(Value::Number(n.clone())),
            Json::String(s) => match parse_number(s) {
                Some(n) if is_int64(&Json::Number(n.clone())) => Ok(Value::Number(n)),
                _ => Err(type_error(path, ty, json)),
            },
            _ => Err(type_error(path, ty, json)),
        },
        AttributeType::Float64 => match json {
            Json::Number(n) => Ok(Value::Number(n.clone())),
            Json::String(s) => parse_number(s)
                .map(Value::Number)
                .ok_or_else(|| type_error(path, ty, json)),
            _ => Err(type_error(path, ty, json)),
        },
        AttributeType::Bool => match json {
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::String(s) if s == "true" => Ok(Value::Bool(true)),
            Json::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(type_error(path, ty, json)),
        },
        AttributeType::List(element_type) | AttributeType::Set(element_type) => {
            let Some(items) = json.as_array() else {
                return Err(type_error(path, ty, json));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode(item, element_type, &join_path(path, &i.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        },
        AttributeType::Map(element_type) => {
            let Some(obj) = json.as_object() else {
                return Err(type_error(path, ty, json));
            };
            obj.iter()
                .map(|(key, item)| {
                    decode(item, element_type, &join_path(path, key)).map(|v| (key.clone(), v))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Value::Object)
        },
        AttributeType::Object(attrs) => {
            let Some(obj) = json.as_object() else {
                return Err(type_error(path, ty, json));
            };
            if let Some(extra) = obj.keys().find(|key| !attrs.contains_key(*key)) {
                return Err(ProviderError::decode(
                    join_path(path, extra),
                    "unsupported attribute",
                ));
            }
            // attributes absent from the JSON decode to null
            attrs
                .iter()
                .map(|(name, attr_type)| -> Result<(String, Value), ProviderError> {
                    let value = match obj.get(name) {
                        Some(item) => decode(item, attr_type, &join_path(path, name))?,
                        None => Value::Null,
                    };
                    Ok((name.clone(), value))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Value::Object)
        },
        AttributeType::Dynamic => Ok(Value::from(json.clone())),
    }
}

fn encode(value: &Value, path: &str) -> Result<Json, ProviderError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Unknown(_) => {
            return Err(ProviderError::UnexpectedValue(format!(
                "value at '{}' is not known",
                path
            )))
        },
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => Json::Number(n.clone()),
        Value::String(s) => Json::String(s.clone()),
        Value::List(items) | Value::Tuple(items) => Json::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| encode(item, &join_path(path, &i.to_string())))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(attrs) => Json::Object(
            attrs
                .iter()
                .map(|(name, item)| -> Result<(String, Json), ProviderError> {
                    Ok((name.clone(), encode(item, &join_path(path, name))?))
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn is_int64(value: &Json) -> bool {
    match value {
        Json::Number(n) => {
            n.is_i64()
                || n.as_f64().is_some_and(|f| {
                    f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
                })
        },
        _ => false,
    }
}

fn parse_number(s: &str) -> Option<serde_json::Number> {
    s.parse().ok()
}

fn type_error(path: &str, expected: &AttributeType, got: &Json) -> ProviderError {
    ProviderError::decode(
        path,
        format!(
            "expected {}, got {}",
            expected.friendly_name(),
            json_type_name(got)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Block, NestedBlock, Schema};
    use serde_json::json;

    fn simple_type() -> AttributeType {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("value", Attribute::optional_string())
            .implied_type()
    }

    fn unmarshal(json: Json, ty: &AttributeType) -> Result<Value, ProviderError> {
        JsonCodec.unmarshal(&serde_json::to_vec(&json).unwrap(), ty)
    }

    #[test]
    fn test_decode_object() {
        let value = unmarshal(json!({"id": "a", "value": "b"}), &simple_type()).unwrap();
        assert_eq!(value, Value::from(json!({"id": "a", "value": "b"})));
    }

    #[test]
    fn test_decode_missing_attribute_is_null() {
        let value = unmarshal(json!({"value": "b"}), &simple_type()).unwrap();
        assert_eq!(value.get("id"), Some(&Value::Null));
    }

    #[test]
    fn test_decode_null_root() {
        assert_eq!(unmarshal(json!(null), &simple_type()).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_rejects_unsupported_attribute() {
        let err = unmarshal(json!({"id": "a", "colour": "red"}), &simple_type()).unwrap_err();
        assert!(
            matches!(&err, ProviderError::Decode { path, message } if path == "colour" && message == "unsupported attribute")
        );
    }

    #[test]
    fn test_decode_wrong_attribute_type() {
        let err = unmarshal(json!({"value": {"x": 1}}), &simple_type()).unwrap_err();
        let ProviderError::Decode { path, message } = err else {
            panic!("expected decode error");
        };
        assert_eq!(path, "value");
        assert_eq!(message, "expected string, got object");
    }

    #[test]
    fn test_decode_converts_primitives_to_string() {
        let value = unmarshal(json!({"id": true, "value": 7}), &simple_type()).unwrap();
        assert_eq!(value, Value::from(json!({"id": "true", "value": "7"})));

        let value = unmarshal(json!(1.5), &AttributeType::String).unwrap();
        assert_eq!(value, Value::string("1.5"));
    }

    #[test]
    fn test_decode_converts_strings_to_primitives() {
        assert_eq!(
            unmarshal(json!("true"), &AttributeType::Bool).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            unmarshal(json!("false"), &AttributeType::Bool).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            unmarshal(json!("2.5"), &AttributeType::Float64).unwrap(),
            Value::from(json!(2.5))
        );
        assert!(unmarshal(json!("yes"), &AttributeType::Bool).is_err());
        assert!(unmarshal(json!("abc"), &AttributeType::Float64).is_err());
        assert!(unmarshal(json!([1]), &AttributeType::String).is_err());
    }

    #[test]
    fn test_decode_root_not_object() {
        let err = unmarshal(json!("not an object"), &simple_type()).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { path, .. } if path.is_empty()));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = JsonCodec.unmarshal(b"{\"id\":", &simple_type()).unwrap_err();
        assert!(matches!(err, ProviderError::Serialization(_)));
    }

    #[test]
    fn test_decode_nested_paths() {
        let ty = Block::new()
            .with_block(
                "rule",
                NestedBlock::list(
                    Block::new().with_attribute("port", Attribute::optional_string()),
                ),
            )
            .implied_type();

        let value = unmarshal(json!({"rule": [{"port": "80"}]}), &ty).unwrap();
        assert_eq!(value, Value::from(json!({"rule": [{"port": "80"}]})));

        let err = unmarshal(json!({"rule": [{"port": "80"}, {"port": [true]}]}), &ty).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { path, .. } if path == "rule.1.port"));
    }

    #[test]
    fn test_decode_int64() {
        let ty = AttributeType::Int64;
        assert!(unmarshal(json!(42), &ty).is_ok());
        assert!(unmarshal(json!(42.0), &ty).is_ok());
        assert!(unmarshal(json!(42.5), &ty).is_err());
        assert_eq!(unmarshal(json!("42"), &ty).unwrap(), Value::from(json!(42)));
        assert!(unmarshal(json!("42.5"), &ty).is_err());
    }

    #[test]
    fn test_decode_map_and_dynamic() {
        let ty = AttributeType::map(AttributeType::Bool);
        let value = unmarshal(json!({"a": true, "b": false}), &ty).unwrap();
        assert_eq!(value.get("b"), Some(&Value::Bool(false)));

        let err = unmarshal(json!({"a": "yes"}), &ty).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { path, .. } if path == "a"));

        let value = unmarshal(json!({"anything": [1, "two"]}), &AttributeType::Dynamic).unwrap();
        assert!(value.get("anything").is_some());
    }

    #[test]
    fn test_encode_roundtrip_simple_state() {
        let value = Value::from(json!({"id": "a", "value": null}));
        let raw = JsonCodec.marshal(&value).unwrap();
        assert_eq!(
            serde_json::from_slice::<Json>(&raw).unwrap(),
            json!({"id": "a", "value": null})
        );
        assert_eq!(JsonCodec.unmarshal(&raw, &simple_type()).unwrap(), value);
    }

    #[test]
    fn test_encode_rejects_unknown() {
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), Value::unknown(AttributeType::String));
        let err = JsonCodec.marshal(&Value::object(attrs)).unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedValue(msg) if msg.contains("'id'")));
    }

    #[test]
    fn test_encode_tuple_as_array() {
        let raw = JsonCodec
            .marshal(&Value::tuple(vec![Value::string("x"), Value::Bool(true)]))
            .unwrap();
        assert_eq!(
            serde_json::from_slice::<Json>(&raw).unwrap(),
            json!(["x", true])
        );
    }
}
