use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::repo_types::ProfileRow;
use crate::energy::{EnergyBudget, Profile};

const PROFILE_COLUMNS: &str = "id, username, is_setup_complete, age, height_cm, weight_kg, gender, \
     activity_level, goal, rate, target_weight_kg, bmr, tdee";

impl ProfileRow {
    pub async fn find(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<ProfileRow>> {
        sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Reads the row and holds its lock until the surrounding transaction ends.
    pub async fn lock(conn: &mut PgConnection, user_id: Uuid) -> sqlx::Result<Option<ProfileRow>> {
        sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_optional(conn)
        .await
    }
}

/// Stores a full profile together with its freshly computed budget.
pub async fn save_setup(
    conn: &mut PgConnection,
    user_id: Uuid,
    profile: &Profile,
    budget: &EnergyBudget,
) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE users
           SET is_setup_complete = TRUE,
               age = $2, height_cm = $3, weight_kg = $4, gender = $5,
               activity_level = $6, goal = $7, rate = $8,
               bmr = $9, tdee = $10
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(i32::try_from(profile.age).map_err(|e| sqlx::Error::Decode(Box::new(e)))?)
    .bind(profile.height_cm)
    .bind(profile.weight_kg)
    .bind(profile.gender.as_str())
    .bind(profile.activity_level.as_str())
    .bind(profile.goal.as_str())
    .bind(profile.rate)
    .bind(budget.bmr)
    .bind(budget.tdee)
    .execute(conn)
    .await?;
    Ok(res.rows_affected() > 0)
}

/// Sets the current weight; bmr/tdee are replaced only when a budget is given.
pub async fn update_weight(
    conn: &mut PgConnection,
    user_id: Uuid,
    weight_kg: f64,
    budget: Option<EnergyBudget>,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE users
           SET weight_kg = $2,
               bmr = COALESCE($3, bmr),
               tdee = COALESCE($4, tdee)
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(weight_kg)
    .bind(budget.map(|b| b.bmr))
    .bind(budget.map(|b| b.tdee))
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn set_target_weight(
    db: &PgPool,
    user_id: Uuid,
    target_weight_kg: f64,
) -> sqlx::Result<Option<f64>> {
    let row: Option<(Option<f64>,)> = sqlx::query_as(
        r#"UPDATE users SET target_weight_kg = $2 WHERE id = $1 RETURNING target_weight_kg"#,
    )
    .bind(user_id)
    .bind(target_weight_kg)
    .fetch_optional(db)
    .await?;
    Ok(row.and_then(|(w,)| w))
}
