use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// Days of history every rule looks back over.
pub const LOOKBACK_DAYS: i64 = 14;
/// Consecutive calendar days checked by the under-eating rule (today included).
pub const UNDER_EATING_DAYS: i64 = 3;
pub const UNDER_EATING_RATIO: f64 = 0.7;
pub const PLATEAU_DELTA_KG: f64 = 0.5;
/// Cardio share must be strictly above this to trigger.
pub const CARDIO_SHARE_LIMIT: f64 = 0.8;

const CARDIO_KEYWORDS: [&str; 4] = ["run", "jog", "bike", "swim"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    UnderEating,
    Plateau,
    CardioImbalance,
}

impl Alert {
    pub fn message(self) -> &'static str {
        match self {
            Alert::UnderEating => "You might be under-eating. Consider reviewing your meal plan.",
            Alert::Plateau => {
                "You may have hit a plateau. Consider adjusting your workout or calorie intake."
            }
            Alert::CardioImbalance => {
                "Great work on cardio! Adding some strength training could improve muscle tone and metabolism."
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FoodIntake {
    pub calories: f64,
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct WeightPoint {
    pub weight_kg: f64,
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct ExerciseSample {
    pub name: String,
    pub logged_at: OffsetDateTime,
}

/// Everything the rules read. `weights` must be in log order.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub now: OffsetDateTime,
    pub tdee: Option<f64>,
    pub food: &'a [FoodIntake],
    pub weights: &'a [WeightPoint],
    pub exercises: &'a [ExerciseSample],
}

/// Runs every rule independently, in declaration order, at most one alert each.
pub fn evaluate(input: &SummaryInput<'_>) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if under_eating(input) {
        alerts.push(Alert::UnderEating);
    }
    if plateau(input) {
        alerts.push(Alert::Plateau);
    }
    if cardio_imbalance(input) {
        alerts.push(Alert::CardioImbalance);
    }
    alerts
}

/// Calorie total per calendar day (UTC), `today` first.
pub fn daily_totals(food: &[FoodIntake], today: Date, days: i64) -> Vec<f64> {
    (0..days)
        .map(|i| {
            let day = today - Duration::days(i);
            food.iter()
                .filter(|f| f.logged_at.to_offset(UtcOffset::UTC).date() == day)
                .map(|f| f.calories)
                .sum::<f64>()
        })
        .collect()
}

// A day without any logged food totals 0 and therefore counts as under the threshold.
fn under_eating(input: &SummaryInput<'_>) -> bool {
    let Some(tdee) = input.tdee else {
        return false;
    };
    let threshold = tdee * UNDER_EATING_RATIO;
    let today = input.now.to_offset(UtcOffset::UTC).date();
    daily_totals(input.food, today, UNDER_EATING_DAYS)
        .into_iter()
        .all(|total| total < threshold)
}

// First and last by log order, not min/max by timestamp.
fn plateau(input: &SummaryInput<'_>) -> bool {
    let since = input.now - Duration::days(LOOKBACK_DAYS);
    let recent: Vec<&WeightPoint> = input
        .weights
        .iter()
        .filter(|w| w.logged_at >= since)
        .collect();
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if recent.len() >= 2 => {
            (first.weight_kg - last.weight_kg).abs() < PLATEAU_DELTA_KG
        }
        _ => false,
    }
}

pub fn is_cardio(name: &str) -> bool {
    let lower = name.to_lowercase();
    CARDIO_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn cardio_imbalance(input: &SummaryInput<'_>) -> bool {
    let since = input.now - Duration::days(LOOKBACK_DAYS);
    let recent: Vec<&ExerciseSample> = input
        .exercises
        .iter()
        .filter(|e| e.logged_at >= since)
        .collect();
    if recent.is_empty() {
        return false;
    }
    let cardio = recent.iter().filter(|e| is_cardio(&e.name)).count();
    (cardio as f64 / recent.len() as f64) > CARDIO_SHARE_LIMIT
}
