use serde::{Deserialize, Serialize};

use super::repo_types::{FoodEntry, MealSlot};

#[derive(Debug, Deserialize)]
pub struct FoodLogQuery {
    /// `YYYY-MM-DD`; today (UTC) when absent.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddFoodRequest {
    pub meal: Option<MealSlot>,
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Default, Serialize)]
pub struct FoodLogDay {
    pub breakfast: Vec<FoodEntry>,
    pub lunch: Vec<FoodEntry>,
    pub dinner: Vec<FoodEntry>,
    pub snacks: Vec<FoodEntry>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct DayTotals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogResponse {
    pub date: String,
    pub food_log: FoodLogDay,
    pub totals: DayTotals,
}

#[derive(Debug, Serialize)]
pub struct FoodEntryResponse {
    pub message: &'static str,
    pub entry: FoodEntry,
}
