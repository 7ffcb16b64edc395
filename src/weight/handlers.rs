use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{WeightLogResponse, WeightRequest},
    repo, services,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    profile::ProfileRow,
    state::AppState,
};

pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/user/weight-log", get(list_weights).post(add_weight))
        .route("/user/weight-log/:id", put(edit_weight).delete(delete_weight))
}

fn required_weight(payload: Result<Json<WeightRequest>, JsonRejection>) -> AppResult<f64> {
    let Json(payload) = payload?;
    payload
        .weight()
        .ok_or_else(|| AppError::Validation("Weight is required".into()))
}

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<WeightLogResponse>> {
    let profile = ProfileRow::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let entries = repo::list(&state.db, user_id).await?;
    Ok(Json(WeightLogResponse {
        message: "Weight log",
        weight_log: entries,
        current_weight: profile.weight_kg,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<WeightRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WeightLogResponse>)> {
    let weight = required_weight(payload)?;
    let log = services::append(&state, user_id, weight).await?;
    info!(%user_id, weight, "weight logged");
    Ok((
        StatusCode::CREATED,
        Json(WeightLogResponse {
            message: "Weight logged and profile updated successfully",
            weight_log: log.entries,
            current_weight: log.current_weight,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn edit_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<WeightRequest>, JsonRejection>,
) -> AppResult<Json<WeightLogResponse>> {
    let weight = required_weight(payload)?;
    let log = services::edit(&state, user_id, id, weight).await?;
    Ok(Json(WeightLogResponse {
        message: "Weight entry updated",
        weight_log: log.entries,
        current_weight: log.current_weight,
    }))
}

#[instrument(skip(state))]
pub async fn delete_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WeightLogResponse>> {
    let log = services::remove(&state, user_id, id).await?;
    Ok(Json(WeightLogResponse {
        message: "Weight entry deleted",
        weight_log: log.entries,
        current_weight: log.current_weight,
    }))
}
