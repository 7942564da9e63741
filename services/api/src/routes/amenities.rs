use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::models::{Amenity, Model, NewAmenity, UpdateAmenity};

use super::{deleted, fetch, to_dicts};
use crate::{
    AppState,
    error::ApiResult,
    extract::JsonBody,
    validation::{parse, require},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/amenities", get(list_amenities).post(create_amenity))
        .route(
            "/amenities/:amenity_id",
            get(get_amenity).put(update_amenity).delete(delete_amenity),
        )
}

pub async fn list_amenities(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let amenities = state.storage.list::<Amenity>().await?;
    Ok(to_dicts(&amenities))
}

pub async fn get_amenity(
    State(state): State<AppState>,
    Path(amenity_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let amenity = fetch::<Amenity>(&state, &amenity_id).await?;
    Ok(Json(amenity.to_dict()))
}

pub async fn create_amenity(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let body = body.object()?;
    require(&body, "name")?;
    let payload: NewAmenity = parse(body)?;

    let amenity = state.storage.persist(Amenity::new(payload)).await?;
    Ok((StatusCode::CREATED, Json(amenity.to_dict())))
}

pub async fn update_amenity(
    State(state): State<AppState>,
    Path(amenity_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let mut amenity = fetch::<Amenity>(&state, &amenity_id).await?;
    let update: UpdateAmenity = parse(body.object()?)?;
    amenity.apply(update);

    let amenity = state.storage.persist(amenity).await?;
    Ok(Json(amenity.to_dict()))
}

/// Delete an amenity; places linked to it lose the link
pub async fn delete_amenity(
    State(state): State<AppState>,
    Path(amenity_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let amenity = fetch::<Amenity>(&state, &amenity_id).await?;
    state.storage.remove(&amenity).await?;
    Ok(deleted())
}
