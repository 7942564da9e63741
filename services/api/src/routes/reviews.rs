use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::models::{Model, NewReview, Place, Review, UpdateReview, User};

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
            "/places/:place_id/reviews",
            get(list_reviews).post(create_review),
        )
        .route(
            "/reviews/:review_id",
            get(get_review).put(update_review).delete(delete_review),
        )
}

/// Reviews of a place
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    let reviews = state.storage.reviews_of(&place.id).await?;
    Ok(to_dicts(&reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let review = fetch::<Review>(&state, &review_id).await?;
    Ok(Json(review.to_dict()))
}

pub async fn create_review(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let place = fetch::<Place>(&state, &place_id).await?;
    let body = body.object()?;
    require(&body, "user_id")?;
    let user_id = string_field(&body, "user_id").ok_or(ApiError::NotFound)?;
    fetch::<User>(&state, user_id).await?;
    require(&body, "text")?;
    let payload: NewReview = parse(body)?;

    let review = state.storage.persist(Review::new(&place.id, payload)).await?;
    Ok((StatusCode::CREATED, Json(review.to_dict())))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let mut review = fetch::<Review>(&state, &review_id).await?;
    let update: UpdateReview = parse(body.object()?)?;
    review.apply(update);

    let review = state.storage.persist(review).await?;
    Ok(Json(review.to_dict()))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let review = fetch::<Review>(&state, &review_id).await?;
    state.storage.remove(&review).await?;
    Ok(deleted())
}
