//! Request payload validation

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// Fail with "Missing {field}" unless the body has the key
pub fn require(body: &Map<String, Value>, field: &str) -> ApiResult<()> {
    if body.contains_key(field) {
        Ok(())
    } else {
        Err(ApiError::missing(field))
    }
}

/// String value of a key, if it holds one
pub fn string_field<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str)
}

/// Decode a body into a typed payload
///
/// Unknown keys are ignored, as are keys the payload does not allow to be
/// set (ids, timestamps, foreign keys fixed at creation). A known key holding
/// a value of the wrong type is rejected.
pub fn parse<T: DeserializeOwned>(body: Map<String, Value>) -> ApiResult<T> {
    serde_json::from_value(Value::Object(body))
        .map_err(|e| ApiError::BadRequest(format!("Invalid payload: {}", e)))
}
