use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::{Duration, OffsetDateTime, UtcOffset};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::alerts::{
    evaluate, ExerciseSample, FoodIntake, SummaryInput, WeightPoint, LOOKBACK_DAYS,
    UNDER_EATING_DAYS,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    exercise::Exercise,
    food::repo as food_repo,
    profile::ProfileRow,
    state::AppState,
    weight::repo as weight_repo,
};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub alerts: Vec<&'static str>,
}

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/user/dashboard-summary", get(dashboard_summary))
}

/// Start of the oldest calendar day (UTC) the under-eating rule inspects.
pub(crate) fn food_window_start(now: OffsetDateTime) -> OffsetDateTime {
    let today = now.to_offset(UtcOffset::UTC).date();
    (today - Duration::days(UNDER_EATING_DAYS - 1))
        .midnight()
        .assume_utc()
}

async fn alerts_at(state: &AppState, user_id: Uuid, now: OffsetDateTime) -> AppResult<Vec<&'static str>> {
    let profile = ProfileRow::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let since = now - Duration::days(LOOKBACK_DAYS);
    let food: Vec<FoodIntake> =
        food_repo::list_between(&state.db, user_id, food_window_start(now), now + Duration::days(1))
            .await?
            .into_iter()
            .map(|f| FoodIntake {
                calories: f.calories,
                logged_at: f.logged_at,
            })
            .collect();
    let weights: Vec<WeightPoint> = weight_repo::list_since(&state.db, user_id, since)
        .await?
        .into_iter()
        .map(|w| WeightPoint {
            weight_kg: w.weight_kg,
            logged_at: w.logged_at,
        })
        .collect();
    let exercises: Vec<ExerciseSample> = Exercise::list_since(&state.db, user_id, since)
        .await?
        .into_iter()
        .map(|e| ExerciseSample {
            name: e.exercise_name,
            logged_at: e.logged_at,
        })
        .collect();

    let alerts = evaluate(&SummaryInput {
        now,
        tdee: profile.tdee,
        food: &food,
        weights: &weights,
        exercises: &exercises,
    });
    debug!(%user_id, ?alerts, "dashboard alerts");
    Ok(alerts.into_iter().map(|a| a.message()).collect())
}

#[instrument(skip(state))]
pub async fn dashboard_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<SummaryResponse>> {
    let alerts = alerts_at(&state, user_id, OffsetDateTime::now_utc()).await?;
    Ok(Json(SummaryResponse { alerts }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn food_window_covers_today_and_two_prior_days() {
        assert_eq!(
            food_window_start(datetime!(2024-03-15 18:00 UTC)),
            datetime!(2024-03-13 00:00 UTC)
        );
        assert_eq!(
            food_window_start(datetime!(2024-03-01 00:30 +02:00)),
            datetime!(2024-02-27 00:00 UTC)
        );
    }

    #[test]
    fn response_lists_plain_messages() {
        let body = serde_json::to_value(SummaryResponse {
            alerts: vec![super::super::alerts::Alert::Plateau.message()],
        })
        .unwrap();
        assert!(body["alerts"][0].as_str().unwrap().contains("plateau"));
    }
}
