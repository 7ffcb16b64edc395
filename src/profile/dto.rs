use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::energy::{ActivityLevel, Gender, Goal, MacroTargets, ProfileDraft};

/// Setup wizard body. Every field is optional here so that a missing field is
/// reported by the calculator's validation instead of a generic JSON error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub rate: Option<f64>,
}

impl From<SetupRequest> for ProfileDraft {
    fn from(r: SetupRequest) -> Self {
        ProfileDraft {
            age: r.age,
            height_cm: r.height,
            weight_kg: r.weight,
            gender: r.gender,
            activity_level: r.activity_level,
            goal: r.goal,
            rate: r.rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub message: &'static str,
    pub bmr: f64,
    pub tdee: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub is_setup_complete: bool,
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: String,
    pub goal: String,
    pub rate: Option<f64>,
    pub target_weight: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub macros: Option<MacroTargets>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetWeightRequest {
    pub target_weight: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetWeightResponse {
    pub message: &'static str,
    pub target_weight: Option<f64>,
}
