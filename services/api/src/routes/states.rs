use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::models::{self, Model, NewState, UpdateState};

use super::{deleted, fetch, to_dicts};
use crate::{
    AppState,
    error::ApiResult,
    extract::JsonBody,
    validation::{parse, require},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/states", get(list_states).post(create_state))
        .route(
            "/states/:state_id",
            get(get_state).put(update_state).delete(delete_state),
        )
}

pub async fn list_states(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let states = state.storage.list::<models::State>().await?;
    Ok(to_dicts(&states))
}

pub async fn get_state(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let record = fetch::<models::State>(&state, &state_id).await?;
    Ok(Json(record.to_dict()))
}

pub async fn create_state(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let body = body.object()?;
    require(&body, "name")?;
    let payload: NewState = parse(body)?;

    let record = state.storage.persist(models::State::new(payload)).await?;
    Ok((StatusCode::CREATED, Json(record.to_dict())))
}

pub async fn update_state(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    let mut record = fetch::<models::State>(&state, &state_id).await?;
    let update: UpdateState = parse(body.object()?)?;
    record.apply(update);

    let record = state.storage.persist(record).await?;
    Ok(Json(record.to_dict()))
}

pub async fn delete_state(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let record = fetch::<models::State>(&state, &state_id).await?;
    state.storage.remove(&record).await?;
    Ok(deleted())
}
