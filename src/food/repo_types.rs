use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snacks => "snacks",
        }
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealSlot::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown meal: {s}"))
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row as stored; `meal` is the text form of [`MealSlot`].
#[derive(Debug, Clone, FromRow)]
pub struct FoodEntryRow {
    pub id: Uuid,
    pub meal: String,
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub meal: MealSlot,
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

impl TryFrom<FoodEntryRow> for FoodEntry {
    type Error = anyhow::Error;

    fn try_from(r: FoodEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            meal: r.meal.parse().map_err(anyhow::Error::msg)?,
            name: r.name,
            calories: r.calories,
            carbs: r.carbs,
            protein: r.protein,
            fat: r.fat,
            logged_at: r.logged_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_slots_parse_their_own_text() {
        for slot in MealSlot::ALL {
            assert_eq!(slot.as_str().parse::<MealSlot>(), Ok(slot));
        }
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn row_with_unknown_meal_is_rejected() {
        let row = FoodEntryRow {
            id: Uuid::new_v4(),
            meal: "elevenses".into(),
            name: "tea".into(),
            calories: 2.0,
            carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
            logged_at: OffsetDateTime::now_utc(),
        };
        assert!(FoodEntry::try_from(row).is_err());
    }
}
