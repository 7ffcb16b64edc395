use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: Uuid,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

const ENTRY_COLUMNS: &str = "id, weight_kg, logged_at";

/// Entries in log order (insertion order), oldest first.
pub async fn list(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<WeightEntry>> {
    sqlx::query_as::<_, WeightEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM weight_logs WHERE user_id = $1 ORDER BY seq ASC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list_tx(conn: &mut PgConnection, user_id: Uuid) -> sqlx::Result<Vec<WeightEntry>> {
    sqlx::query_as::<_, WeightEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM weight_logs WHERE user_id = $1 ORDER BY seq ASC"
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await
}

/// Entries logged at or after `since`, in log order.
pub async fn list_since(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> sqlx::Result<Vec<WeightEntry>> {
    sqlx::query_as::<_, WeightEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM weight_logs \
         WHERE user_id = $1 AND logged_at >= $2 ORDER BY seq ASC"
    ))
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await
}

pub async fn insert(conn: &mut PgConnection, user_id: Uuid, weight_kg: f64) -> sqlx::Result<WeightEntry> {
    sqlx::query_as::<_, WeightEntry>(&format!(
        "INSERT INTO weight_logs (user_id, weight_kg) VALUES ($1, $2) RETURNING {ENTRY_COLUMNS}"
    ))
    .bind(user_id)
    .bind(weight_kg)
    .fetch_one(conn)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    user_id: Uuid,
    entry_id: Uuid,
    weight_kg: f64,
) -> sqlx::Result<Option<WeightEntry>> {
    sqlx::query_as::<_, WeightEntry>(&format!(
        "UPDATE weight_logs SET weight_kg = $3 WHERE id = $2 AND user_id = $1 RETURNING {ENTRY_COLUMNS}"
    ))
    .bind(user_id)
    .bind(entry_id)
    .bind(weight_kg)
    .fetch_optional(conn)
    .await
}

pub async fn delete(
    conn: &mut PgConnection,
    user_id: Uuid,
    entry_id: Uuid,
) -> sqlx::Result<Option<WeightEntry>> {
    sqlx::query_as::<_, WeightEntry>(&format!(
        "DELETE FROM weight_logs WHERE id = $2 AND user_id = $1 RETURNING {ENTRY_COLUMNS}"
    ))
    .bind(user_id)
    .bind(entry_id)
    .fetch_optional(conn)
    .await
}
