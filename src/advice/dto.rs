use serde::{Deserialize, Serialize};

use crate::energy::Goal;

/// Daily macro targets in grams, as the client sends them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MacroGrams {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub question: String,
    pub user_goal: Option<Goal>,
    pub user_macros: Option<MacroGrams>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub message: String,
}
