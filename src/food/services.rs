use time::{macros::format_description, Date, OffsetDateTime};

use super::{
    dto::{AddFoodRequest, DayTotals, FoodLogDay},
    repo::NewFoodEntry,
    repo_types::{FoodEntry, MealSlot},
};
use crate::error::{AppError, AppResult};

/// Calendar day requested by the client, today (UTC) by default.
pub fn parse_day(raw: Option<&str>, now: OffsetDateTime) -> AppResult<Date> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(now.date()),
        Some(s) => Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map_err(|_| AppError::Validation(format!("Invalid date: {s}, expected YYYY-MM-DD"))),
    }
}

pub fn format_day(day: Date) -> String {
    day.format(format_description!("[year]-[month]-[day]")).unwrap_or_else(|_| day.to_string())
}

fn non_negative(field: &str, v: Option<f64>) -> AppResult<f64> {
    match v {
        None => Ok(0.0),
        Some(x) if x.is_finite() && x >= 0.0 => Ok(x),
        Some(_) => Err(AppError::Validation(format!("{field} must be a non-negative number"))),
    }
}

pub fn validate_new_entry(req: &AddFoodRequest) -> AppResult<NewFoodEntry<'_>> {
    let missing = || AppError::Validation("Missing required fields".into());
    let meal = req.meal.ok_or_else(missing)?;
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(missing)?;
    let calories = req.calories.ok_or_else(missing)?;
    Ok(NewFoodEntry {
        meal,
        name,
        calories: non_negative("calories", Some(calories))?,
        carbs: non_negative("carbs", req.carbs)?,
        protein: non_negative("protein", req.protein)?,
        fat: non_negative("fat", req.fat)?,
    })
}

/// Splits one day's entries by meal and sums them.
pub fn group_day(entries: Vec<FoodEntry>) -> (FoodLogDay, DayTotals) {
    let mut day = FoodLogDay::default();
    let mut totals = DayTotals::default();
    for e in entries {
        totals.calories += e.calories;
        totals.carbs += e.carbs;
        totals.protein += e.protein;
        totals.fat += e.fat;
        match e.meal {
            MealSlot::Breakfast => day.breakfast.push(e),
            MealSlot::Lunch => day.lunch.push(e),
            MealSlot::Dinner => day.dinner.push(e),
            MealSlot::Snacks => day.snacks.push(e),
        }
    }
    (day, totals)
}
