//! Service status and object counts

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use common::models::EntityKind;
use serde_json::{Map, Value, json};

use crate::{AppState, error::ApiResult};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/stats", get(stats))
}

/// Liveness check
pub async fn status() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

/// Number of stored objects of each kind
pub async fn stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut counts = Map::new();
    for kind in EntityKind::ALL {
        let count = state.storage.count(Some(kind)).await?;
        counts.insert(kind.collection().to_string(), Value::from(count));
    }

    Ok(Json(Value::Object(counts)))
}
