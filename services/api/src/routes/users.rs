use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::models::{Model, NewUser, UpdateUser, User};

use super::{deleted, fetch, to_dicts};
use crate::{
    AppState,
    error::ApiResult,
    extract::JsonBody,
    validation::{parse, require},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.storage.list::<User>().await?;
    Ok(to_dicts(&users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = fetch::<User>(&state, &user_id).await?;
    Ok(Json(user.to_dict()))
}

/// Register a user; the password is stored hashed and never returned
pub async fn create_user(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let body = body.object()?;
    require(&body, "email")?;
    require(&body, "password")?;
    let payload: NewUser = parse(body)?;

    let user = state.storage.persist(User::new(payload)?).await?;
    Ok((StatusCode::CREATED, Json(user.to_dict())))
}

/// Update a user; `email` cannot be changed
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let mut user = fetch::<User>(&state, &user_id).await?;
    let update: UpdateUser = parse(body.object()?)?;
    user.apply(update)?;

    let user = state.storage.persist(user).await?;
    Ok(Json(user.to_dict()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = fetch::<User>(&state, &user_id).await?;
    state.storage.remove(&user).await?;
    Ok(deleted())
}
