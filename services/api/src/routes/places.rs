use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::models::{City, Model, NewPlace, Place, UpdatePlace, User};

use super::{deleted, fetch, to_dicts};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    validation::{parse, require, string_field},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cities/:city_id/places",
            get(list_places).post(create_place),
        )
        .route(
            "/places/:place_id",
            get(get_place).put(update_place).delete(delete_place),
        )
}

/// Places of a city
pub async fn list_places(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let city = fetch::<City>(&state, &city_id).await?;
    let places = state.storage.places_of(&city.id).await?;
    Ok(to_dicts(&places))
}

pub async fn get_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    Ok(Json(place.to_dict()))
}

/// Create a place in a city, owned by an existing user
pub async fn create_place(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let city = fetch::<City>(&state, &city_id).await?;
    let body = body.object()?;
    require(&body, "user_id")?;
    let user_id = string_field(&body, "user_id").ok_or(ApiError::NotFound)?;
    fetch::<User>(&state, user_id).await?;
    require(&body, "name")?;
    let payload: NewPlace = parse(body)?;

    let place = state.storage.persist(Place::new(&city.id, payload)).await?;
    Ok((StatusCode::CREATED, Json(place.to_dict())))
}

/// Update a place; `city_id` and `user_id` are fixed at creation
pub async fn update_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let mut place = fetch::<Place>(&state, &place_id).await?;
    let update: UpdatePlace = parse(body.object()?)?;
    place.apply(update);

    let place = state.storage.persist(place).await?;
    Ok(Json(place.to_dict()))
}

/// Delete a place and its amenity links
pub async fn delete_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    state.storage.remove(&place).await?;
    Ok(deleted())
}
