use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Exercise, ExercisePatch, NewExercise};

const EXERCISE_COLUMNS: &str =
    "id, user_id, exercise_name, duration_min, calories_burned, met, logged_at";

impl Exercise {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Exercise>> {
        sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE user_id = $1 ORDER BY logged_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn list_since(
        db: &PgPool,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> sqlx::Result<Vec<Exercise>> {
        sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises \
             WHERE user_id = $1 AND logged_at >= $2 ORDER BY logged_at ASC"
        ))
        .bind(user_id)
        .bind(since)
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Exercise>> {
        sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewExercise) -> sqlx::Result<Exercise> {
        sqlx::query_as::<_, Exercise>(&format!(
            r#"
            INSERT INTO exercises (user_id, exercise_name, duration_min, calories_burned, met)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&new.exercise_name)
        .bind(new.duration_min)
        .bind(new.calories_burned)
        .bind(new.met)
        .fetch_one(db)
        .await
    }

    /// Applies the patch only when the row belongs to `user_id`.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        patch: &ExercisePatch,
    ) -> sqlx::Result<Option<Exercise>> {
        sqlx::query_as::<_, Exercise>(&format!(
            r#"
            UPDATE exercises
               SET exercise_name = COALESCE($3, exercise_name),
                   duration_min = COALESCE($4, duration_min),
                   calories_burned = COALESCE($5, calories_burned)
             WHERE id = $1 AND user_id = $2
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.exercise_name.as_deref())
        .bind(patch.duration_min)
        .bind(patch.calories_burned)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM exercises WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
