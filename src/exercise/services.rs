use uuid::Uuid;

use super::{
    dto::{CreateExerciseRequest, UpdateExerciseRequest},
    met::session_calories,
    repo_types::{Exercise, ExercisePatch, NewExercise},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

fn positive(field: &str, v: f64) -> AppResult<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(AppError::Validation(format!("{field} must be a positive number")))
    }
}

fn name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}

/// Client calories win when positive; otherwise `MET * kg * hours` from the stored weight.
pub fn validate_new(req: &CreateExerciseRequest, weight_kg: Option<f64>) -> AppResult<NewExercise> {
    let exercise_name = name(req.exercise_name.as_deref())
        .ok_or_else(|| AppError::Validation("exerciseName is required".into()))?;
    let duration_min = positive(
        "duration",
        req.duration
            .ok_or_else(|| AppError::Validation("duration is required".into()))?,
    )?;
    let met = req.met.map(|m| positive("MET", m)).transpose()?;

    let calories_burned = match req.calories_burned {
        Some(c) if c < 0.0 || !c.is_finite() => {
            return Err(AppError::Validation(
                "caloriesBurned must be a positive number".into(),
            ))
        }
        Some(c) if c > 0.0 => c,
        _ => {
            let met = met.ok_or_else(|| {
                AppError::Validation("caloriesBurned or MET is required".into())
            })?;
            let weight = weight_kg.ok_or_else(|| {
                AppError::Validation("Set your weight before logging by MET".into())
            })?;
            session_calories(met, weight, duration_min)
        }
    };

    Ok(NewExercise {
        exercise_name,
        duration_min,
        calories_burned,
        met,
    })
}

pub fn validate_patch(req: &UpdateExerciseRequest) -> AppResult<ExercisePatch> {
    if req.exercise_name.is_some() && name(req.exercise_name.as_deref()).is_none() {
        return Err(AppError::Validation("exerciseName must not be empty".into()));
    }
    Ok(ExercisePatch {
        exercise_name: name(req.exercise_name.as_deref()),
        duration_min: req.duration.map(|d| positive("duration", d)).transpose()?,
        calories_burned: req
            .calories_burned
            .map(|c| positive("caloriesBurned", c))
            .transpose()?,
    })
}

/// Loads an entry the caller is allowed to change.
pub async fn owned(st: &AppState, user_id: Uuid, id: Uuid) -> AppResult<Exercise> {
    let exercise = Exercise::find(&st.db, id)
        .await?
        .ok_or(AppError::NotFound("Exercise"))?;
    if exercise.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(exercise)
}
