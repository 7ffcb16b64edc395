use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{AddFoodRequest, FoodEntryResponse, FoodLogQuery, FoodLogResponse},
    repo,
    repo_types::{FoodEntry, MealSlot},
    services::{format_day, group_day, parse_day, validate_new_entry},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/user/food-log", get(get_food_log).post(add_food))
        .route("/user/food-log/:meal/:food_id", delete(delete_food))
}

#[instrument(skip(state))]
pub async fn get_food_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<FoodLogQuery>, QueryRejection>,
) -> AppResult<Json<FoodLogResponse>> {
    let Query(query) = query?;
    let day = parse_day(query.date.as_deref(), OffsetDateTime::now_utc())?;
    let from = day.midnight().assume_utc();
    let rows = repo::list_between(&state.db, user_id, from, from + Duration::days(1)).await?;
    let entries = rows
        .into_iter()
        .map(FoodEntry::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let (food_log, totals) = group_day(entries);
    Ok(Json(FoodLogResponse {
        date: format_day(day),
        food_log,
        totals,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<AddFoodRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FoodEntryResponse>)> {
    let Json(payload) = payload?;
    let new_entry = validate_new_entry(&payload)?;
    let row = repo::insert(&state.db, user_id, &new_entry).await?;
    let entry = FoodEntry::try_from(row)?;

    info!(%user_id, meal = %entry.meal, calories = entry.calories, "food logged");
    Ok((
        StatusCode::CREATED,
        Json(FoodEntryResponse {
            message: "Food added",
            entry,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((meal, food_id)): Path<(MealSlot, Uuid)>,
) -> AppResult<Json<serde_json::Value>> {
    if !repo::delete(&state.db, user_id, meal, food_id).await? {
        return Err(AppError::NotFound("Food entry"));
    }
    Ok(Json(serde_json::json!({ "message": "Food deleted" })))
}
