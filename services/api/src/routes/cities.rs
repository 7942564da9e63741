use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::models::{self, City, Model, NewCity, UpdateCity};

use super::{deleted, fetch, to_dicts};
use crate::{
    AppState,
    error::ApiResult,
    extract::JsonBody,
    validation::{parse, require},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/states/:state_id/cities",
            get(list_cities).post(create_city),
        )
        .route(
            "/cities/:city_id",
            get(get_city).put(update_city).delete(delete_city),
        )
}

/// Cities of a state
pub async fn list_cities(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let parent = fetch::<models::State>(&state, &state_id).await?;
    let cities = state.storage.cities_of(&parent.id).await?;
    Ok(to_dicts(&cities))
}

pub async fn get_city(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let city = fetch::<City>(&state, &city_id).await?;
    Ok(Json(city.to_dict()))
}

/// Create a city in a state; any `state_id` in the body is ignored
pub async fn create_city(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let parent = fetch::<models::State>(&state, &state_id).await?;
    let body = body.object()?;
    require(&body, "name")?;
    let payload: NewCity = parse(body)?;

    let city = state.storage.persist(City::new(&parent.id, payload)).await?;
    Ok((StatusCode::CREATED, Json(city.to_dict())))
}

pub async fn update_city(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let mut city = fetch::<City>(&state, &city_id).await?;
    let update: UpdateCity = parse(body.object()?)?;
    city.apply(update);

    let city = state.storage.persist(city).await?;
    Ok(Json(city.to_dict()))
}

pub async fn delete_city(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let city = fetch::<City>(&state, &city_id).await?;
    state.storage.remove(&city).await?;
    Ok(deleted())
}
