use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{FoodEntryRow, MealSlot};

const ENTRY_COLUMNS: &str = "id, meal, name, calories, carbs, protein, fat, logged_at";

/// New entry as validated by the handler.
#[derive(Debug)]
pub struct NewFoodEntry<'a> {
    pub meal: MealSlot,
    pub name: &'a str,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Entries with `from <= logged_at < to`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> sqlx::Result<Vec<FoodEntryRow>> {
    sqlx::query_as::<_, FoodEntryRow>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
          FROM food_entries
         WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
         ORDER BY logged_at ASC
        "#
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}

pub async fn insert(db: &PgPool, user_id: Uuid, entry: &NewFoodEntry<'_>) -> sqlx::Result<FoodEntryRow> {
    sqlx::query_as::<_, FoodEntryRow>(&format!(
        r#"
        INSERT INTO food_entries (user_id, meal, name, calories, carbs, protein, fat)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {ENTRY_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(entry.meal.as_str())
    .bind(entry.name)
    .bind(entry.calories)
    .bind(entry.carbs)
    .bind(entry.protein)
    .bind(entry.fat)
    .fetch_one(db)
    .await
}

/// Returns whether a row was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, meal: MealSlot, entry_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"DELETE FROM food_entries WHERE id = $1 AND user_id = $2 AND meal = $3"#,
    )
    .bind(entry_id)
    .bind(user_id)
    .bind(meal.as_str())
    .execute(db)
    .await?;
    Ok(res.rows_affected() > 0)
}
