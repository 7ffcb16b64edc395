use serde::{Deserialize, Serialize};

use super::repo_types::Exercise;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub exercise_name: Option<String>,
    pub duration: Option<f64>,
    pub calories_burned: Option<f64>,
    #[serde(rename = "MET")]
    pub met: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub exercise_name: Option<String>,
    pub duration: Option<f64>,
    pub calories_burned: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedExerciseResponse {
    pub message: &'static str,
    pub saved_exercise: Exercise,
    #[serde(rename = "updatedTDEE")]
    pub updated_tdee: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub activity: String,
    pub duration: Option<f64>,
}
