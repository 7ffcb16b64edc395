use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateExerciseRequest, CreatedExerciseResponse, LookupQuery, UpdateExerciseRequest},
    lookup::{effective_minutes, estimate, CalorieEstimate},
    met::DEFAULT_WEIGHT_KG,
    repo_types::Exercise,
    services::{owned, validate_new, validate_patch},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    profile::ProfileRow,
    state::AppState,
};

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/exercise-log", post(create_exercise))
        .route("/exercise-log/user/:user_id", get(list_exercises))
        .route("/exercise-log/:id", put(update_exercise).delete(delete_exercise))
        .route("/exercise-lookup", get(lookup_exercise))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Exercise>>> {
    if caller != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(Json(Exercise::list_by_user(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateExerciseRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedExerciseResponse>)> {
    let Json(payload) = payload?;
    let profile = ProfileRow::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let new = validate_new(&payload, profile.weight_kg)?;
    let saved = Exercise::create(&state.db, user_id, &new).await?;

    info!(%user_id, exercise_id = %saved.id, calories = saved.calories_burned, "exercise logged");
    Ok((
        StatusCode::CREATED,
        Json(CreatedExerciseResponse {
            message: "Exercise logged",
            saved_exercise: saved,
            updated_tdee: profile.tdee,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateExerciseRequest>, JsonRejection>,
) -> AppResult<Json<Exercise>> {
    let Json(payload) = payload?;
    let patch = validate_patch(&payload)?;
    owned(&state, user_id, id).await?;

    let updated = Exercise::update(&state.db, id, user_id, &patch)
        .await?
        .ok_or(AppError::NotFound("Exercise"))?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    owned(&state, user_id, id).await?;
    if !Exercise::delete(&state.db, id, user_id).await? {
        return Err(AppError::NotFound("Exercise"));
    }
    Ok(Json(serde_json::json!({ "message": "Exercise deleted" })))
}

#[instrument(skip(state))]
pub async fn lookup_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> AppResult<Json<CalorieEstimate>> {
    let Query(query) = query?;
    let weight = ProfileRow::find(&state.db, user_id)
        .await?
        .and_then(|p| p.weight_kg)
        .unwrap_or(DEFAULT_WEIGHT_KG);

    let result = estimate(
        state.activities.as_ref(),
        &query.activity,
        effective_minutes(query.duration),
        weight,
    )
    .await?;
    Ok(Json(result))
}
