use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    #[serde(rename = "duration")]
    pub duration_min: f64,
    pub calories_burned: f64,
    #[serde(rename = "MET")]
    pub met: Option<f64>,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

/// Validated fields for a new log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub exercise_name: String,
    pub duration_min: f64,
    pub calories_burned: f64,
    pub met: Option<f64>,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExercisePatch {
    pub exercise_name: Option<String>,
    pub duration_min: Option<f64>,
    pub calories_burned: Option<f64>,
}
