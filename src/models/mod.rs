//! SambaSafety API model types.
//!
//! Models are value snapshots decoded from loosely-typed JSON objects.
//! Decoding is lenient: missing fields take defaults, unparsable timestamps
//! become `None`, numeric strings are accepted for numeric fields, and
//! camelCase spellings are accepted for multi-word keys.

mod accident;
mod auth;
mod de;
mod driver;
mod fleet;
mod license;
mod mvr;
mod violation;

pub use accident::*;
pub use auth::*;
pub use driver::*;
pub use fleet::*;
pub use license::*;
pub use mvr::*;
pub use violation::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{json_kind, JsonMap};
use crate::error::{Result, SambaSafetyError};

/// A model that can be decoded from and encoded to a JSON object.
///
/// `from_json(x.to_json()) == x` holds for every field the model declares.
pub trait Resource: Serialize + DeserializeOwned {
    /// snake_case fields the server may also send in camelCase.
    const CAMEL_CASE_FIELDS: &'static [&'static str] = &[];

    /// Decode from a JSON value, which must be an object.
    ///
    /// When both spellings of a field are present the snake_case one wins.
    fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SambaSafetyError::ResponseFormat(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };
        de::fold_camel_case(&mut map, Self::CAMEL_CASE_FIELDS);
        serde_json::from_value(Value::Object(map))
            .map_err(|e| SambaSafetyError::ResponseFormat(e.to_string()))
    }

    /// Decode from a JSON object.
    fn from_json(map: JsonMap) -> Result<Self> {
        Self::from_value(Value::Object(map))
    }

    /// Encode to a JSON object with snake_case keys and RFC 3339 timestamps.
    fn to_json(&self) -> JsonMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => JsonMap::new(),
        }
    }
}

/// Decode a single-resource response, `{data: {...}}` or the bare object.
pub(crate) fn single_from_response<T: Resource>(response: JsonMap) -> Result<T> {
    single_from_key(response, "data")
}

/// Decode the object under `key`, falling back to the whole response.
pub(crate) fn single_from_key<T: Resource>(mut response: JsonMap, key: &str) -> Result<T> {
    match response.remove(key) {
        Some(Value::Object(inner)) => T::from_json(inner),
        Some(other) if !other.is_null() => {
            response.insert(key.to_string(), other);
            T::from_json(response)
        }
        _ => T::from_json(response),
    }
}

/// Decode the array under `key`. Missing or `null` yields an empty list.
pub(crate) fn list_from_key<T: Resource>(mut response: JsonMap, key: &str) -> Result<Vec<T>> {
    match response.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values.into_iter().map(T::from_value).collect(),
        Some(other) => Err(SambaSafetyError::ResponseFormat(format!(
            "expected '{key}' to be an array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Build `<collection>/<id>` with the id percent-encoded.
pub(crate) fn resource_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}
