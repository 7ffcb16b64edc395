use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{
        ProfileResponse, SetupRequest, SetupResponse, TargetWeightRequest, TargetWeightResponse,
    },
    repo,
    repo_types::ProfileRow,
    services,
};
use crate::{
    auth::AuthUser,
    energy::{MacroTargets, ProfileDraft},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/user/setup-complete", put(setup_complete))
        .route("/user/profile", get(get_profile))
        .route("/user/target-weight", get(get_target_weight).put(set_target_weight))
}

#[instrument(skip(state, payload))]
pub async fn setup_complete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> AppResult<Json<SetupResponse>> {
    let Json(payload) = payload?;
    let profile = ProfileDraft::from(payload).validate().map_err(|e| {
        warn!(%user_id, error = %e, "setup rejected");
        e
    })?;
    let budget = profile.budget();

    services::complete_setup(&state, user_id, &profile, &budget).await?;

    info!(%user_id, bmr = budget.bmr, tdee = budget.tdee, "setup completed");
    Ok(Json(SetupResponse {
        message: "Setup completed",
        bmr: budget.bmr,
        tdee: budget.tdee,
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let row = ProfileRow::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(ProfileResponse {
        id: row.id,
        macros: row.tdee.map(MacroTargets::from_tdee),
        username: row.username,
        is_setup_complete: row.is_setup_complete,
        age: row.age,
        height: row.height_cm,
        weight: row.weight_kg,
        gender: row.gender,
        activity_level: row.activity_level,
        goal: row.goal,
        rate: row.rate,
        target_weight: row.target_weight_kg,
        bmr: row.bmr,
        tdee: row.tdee,
    }))
}

#[instrument(skip(state, payload))]
pub async fn set_target_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<TargetWeightRequest>, JsonRejection>,
) -> AppResult<Json<TargetWeightResponse>> {
    let Json(payload) = payload?;
    let target = payload
        .target_weight
        .filter(|w| w.is_finite() && *w > 0.0)
        .ok_or_else(|| AppError::Validation("Target weight is required.".into()))?;

    let stored = repo::set_target_weight(&state.db, user_id, target)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(TargetWeightResponse {
        message: "Target weight updated",
        target_weight: Some(stored),
    }))
}

#[instrument(skip(state))]
pub async fn get_target_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<TargetWeightResponse>> {
    let row = ProfileRow::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(TargetWeightResponse {
        message: "Target weight",
        target_weight: row.target_weight_kg,
    }))
}
