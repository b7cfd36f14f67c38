//! Conversion of raw JSON responses into generic objects

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{ClientError, Result};

/// Read-only view over a single JSON object as received from GitLab
///
/// Keys absent from the response are absent here; nothing is defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectifiedHash {
    fields: Map<String, Value>,
}

impl ObjectifiedHash {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value for `key`, `None` if the response had no such key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Nested object under `key`
    pub fn get_object(&self, key: &str) -> Option<ObjectifiedHash> {
        match self.get(key) {
            Some(Value::Object(map)) => Some(Self::new(map.clone())),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The exact key/value pairs that were received, in response order
    pub fn to_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Decode into a typed view of the resource
    pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&Value::Object(self.fields.clone()))
    }
}

impl From<Map<String, Value>> for ObjectifiedHash {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

impl std::fmt::Display for ObjectifiedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", Value::Object(self.fields.clone()))
    }
}

/// Shape of a hydrated response body
#[derive(Debug, Clone, PartialEq)]
pub enum Hydrated {
    Object(ObjectifiedHash),
    Collection(Vec<ObjectifiedHash>),
    Empty,
}

impl Hydrated {
    pub fn into_object(self, endpoint: &str) -> Result<ObjectifiedHash> {
        match self {
            Hydrated::Object(object) => Ok(object),
            _ => Err(ClientError::unexpected_shape(endpoint, "a JSON object")),
        }
    }

    /// Like `into_object`, but an empty body is accepted as `None`
    pub fn into_optional_object(self, endpoint: &str) -> Result<Option<ObjectifiedHash>> {
        match self {
            Hydrated::Object(object) => Ok(Some(object)),
            Hydrated::Empty => Ok(None),
            Hydrated::Collection(_) => {
                Err(ClientError::unexpected_shape(endpoint, "a JSON object or no content"))
            },
        }
    }

    pub fn into_collection(self, endpoint: &str) -> Result<Vec<ObjectifiedHash>> {
        match self {
            Hydrated::Collection(items) => Ok(items),
            _ => Err(ClientError::unexpected_shape(endpoint, "a JSON array")),
        }
    }
}

/// Hydrate a raw response body
///
/// Arrays become collections, objects become a single `ObjectifiedHash`, and
/// an empty body is `Hydrated::Empty`.
pub fn hydrate(endpoint: &str, body: &str) -> Result<Hydrated> {
    if body.trim().is_empty() {
        return Ok(Hydrated::Empty);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ClientError::json_parse(endpoint, e))?;

    match value {
        Value::Object(map) => Ok(Hydrated::Object(map.into())),
        Value::Array(values) => values
            .into_iter()
            .map(|value| match value {
                Value::Object(map) => Ok(ObjectifiedHash::from(map)),
                _ => Err(ClientError::unexpected_shape(endpoint, "an array of JSON objects")),
            })
            .collect::<Result<Vec<_>>>()
            .map(Hydrated::Collection),
        _ => Err(ClientError::unexpected_shape(endpoint, "a JSON object or array")),
    }
}
