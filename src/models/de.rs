//! Lenient field decoders.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_with::{DeserializeAs, SerializeAs};

use super::Resource;
use crate::client::JsonMap;

/// Decode an identifier sent either as a string or a number. `null` is empty.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string or number identifier, got {other}"
        ))),
    }
}

/// Move camelCase spellings of `fields` onto their snake_case keys.
///
/// The snake_case value is kept unless it is missing or `null`; the
/// camelCase key is always removed.
pub(crate) fn fold_camel_case(map: &mut JsonMap, fields: &[&str]) {
    for field in fields {
        let Some(value) = map.remove(&camel_case(field)) else {
            continue;
        };
        if map.get(*field).map_or(true, Value::is_null) {
            map.insert((*field).to_string(), value);
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Nested model decoded with the same key folding as [`Resource::from_value`].
pub(crate) struct Folded;

impl<T: Serialize> SerializeAs<T> for Folded {
    fn serialize_as<S: Serializer>(source: &T, serializer: S) -> Result<S::Ok, S::Error> {
        source.serialize(serializer)
    }
}

impl<'de, T: Resource> DeserializeAs<'de, T> for Folded {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        if let Value::Object(map) = &mut value {
            fold_camel_case(map, T::CAMEL_CASE_FIELDS);
        }
        serde_json::from_value(value).map_err(D::Error::custom)
    }
}

/// Truthiness of a loosely typed flag.
///
/// Numbers are true when non-zero; strings are true unless empty, `0`,
/// `false`, `no` or `off` (case-insensitive); `null` is false.
pub(crate) struct LooseBool;

impl SerializeAs<bool> for LooseBool {
    fn serialize_as<S: Serializer>(source: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*source)
    }
}

impl<'de> DeserializeAs<'de, bool> for LooseBool {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "no" | "off"
            ),
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        })
    }
}

/// Integer sent as a number, an integral float (`2.0`) or a numeric string.
pub(crate) struct LooseInt;

fn integral(value: &Value) -> Option<i64> {
    let whole = |f: f64| (f.is_finite() && f.fract() == 0.0).then_some(f as i64);
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn loose_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Value::deserialize(deserializer)?;
    integral(&value)
        .and_then(|i| T::try_from(i).ok())
        .ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}")))
}

impl SerializeAs<u32> for LooseInt {
    fn serialize_as<S: Serializer>(source: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*source)
    }
}

impl<'de> DeserializeAs<'de, u32> for LooseInt {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        loose_int(deserializer)
    }
}

impl SerializeAs<i64> for LooseInt {
    fn serialize_as<S: Serializer>(source: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*source)
    }
}

impl<'de> DeserializeAs<'de, i64> for LooseInt {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        loose_int(deserializer)
    }
}
