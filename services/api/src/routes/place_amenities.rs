//! Links between places and amenities

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use common::models::{Amenity, Model, Place};

use super::{deleted, fetch, to_dicts};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/places/:place_id/amenities", get(list_place_amenities))
        .route(
            "/places/:place_id/amenities/:amenity_id",
            post(link_amenity).delete(unlink_amenity),
        )
}

pub async fn list_place_amenities(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    let amenities = state.storage.amenities_of(&place.id).await?;
    Ok(to_dicts(&amenities))
}

/// Link an amenity to a place: 201 when new, 200 when already linked
pub async fn link_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    let amenity = fetch::<Amenity>(&state, &amenity_id).await?;

    let status = if state.storage.add_amenity(&place.id, &amenity.id).await? {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(amenity.to_dict())))
}

/// Unlink an amenity from a place; the amenity itself is kept
pub async fn unlink_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    let amenity = fetch::<Amenity>(&state, &amenity_id).await?;

    if !state.storage.remove_amenity(&place.id, &amenity.id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(deleted())
}
