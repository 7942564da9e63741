//! API service routes

use axum::{Json, Router, response::IntoResponse};
use common::models::Model;
use serde_json::{Value, json};
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

mod amenities;
mod cities;
mod index;
mod place_amenities;
mod places;
mod reviews;
mod states;
mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(index::routes())
        .merge(states::routes())
        .merge(cities::routes())
        .merge(amenities::routes())
        .merge(users::routes())
        .merge(places::routes())
        .merge(reviews::routes())
        .merge(place_amenities::routes())
        .method_not_allowed_fallback(method_not_allowed);

    Router::new()
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The router with trailing slashes stripped before routing
pub fn create_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Load an entity or answer 404
async fn fetch<M: Model>(state: &AppState, id: &str) -> ApiResult<M> {
    state.storage.find::<M>(id).await?.ok_or(ApiError::NotFound)
}

fn to_dicts<M: Model>(models: &[M]) -> Json<Vec<Value>> {
    Json(models.iter().map(Model::to_dict).collect())
}

fn deleted() -> impl IntoResponse {
    Json(json!({}))
}
