//! Request body extraction

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use std::convert::Infallible;

use crate::error::{ApiError, ApiResult};

/// A request body that may or may not hold a JSON object
///
/// Extraction never fails so that handlers can check path entities first
/// and report "Not a JSON" only once those exist.
#[derive(Debug, Default)]
pub struct JsonBody(Option<Map<String, Value>>);

impl JsonBody {
    /// The body as a JSON object, or a "Not a JSON" error
    pub fn object(self) -> ApiResult<Map<String, Value>> {
        self.0.ok_or_else(ApiError::not_a_json)
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(bytes) = Bytes::from_request(req, state).await else {
            return Ok(Self(None));
        };

        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(Some(map))),
            _ => Ok(Self(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};

    async fn extract(body: &'static str) -> JsonBody {
        let req = http::Request::builder().body(Body::from(body)).unwrap();
        JsonBody::from_request(req, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_object_body_is_accepted() {
        let body = extract(r#"{"name": "Texas"}"#).await.object().unwrap();
        assert_eq!(body["name"], "Texas");
    }

    #[tokio::test]
    async fn test_empty_object_is_accepted() {
        assert!(extract("{}").await.object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_objects_are_not_json() {
        for body in ["", "not json", "[1, 2]", "\"name\"", "null"] {
            let err = extract(body).await.object().unwrap_err();
            assert_eq!(err.to_string(), "Not a JSON");
        }
    }
}
