use serde::{Deserialize, Serialize};

use super::repo::WeightEntry;

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub weight: Option<f64>,
}

impl WeightRequest {
    pub fn weight(&self) -> Option<f64> {
        self.weight.filter(|w| w.is_finite() && *w > 0.0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogResponse {
    pub message: &'static str,
    pub weight_log: Vec<WeightEntry>,
    pub current_weight: Option<f64>,
}
