use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use super::repo::{self, WeightEntry};
use crate::{
    error::{AppError, AppResult},
    profile::{repo as profile_repo, ProfileRow},
    state::AppState,
};

/// Log after a mutation plus the profile weight it left behind.
#[derive(Debug)]
pub struct WeightLogState {
    pub entries: Vec<WeightEntry>,
    pub current_weight: Option<f64>,
}

/// New profile weight after a log mutation, or `None` when the latest entry
/// (by log order) is unchanged. Removing the only entry leaves the profile as is.
pub(crate) fn mirrored_weight(before: &[WeightEntry], after: &[WeightEntry]) -> Option<f64> {
    let last = after.last()?;
    match before.last() {
        Some(prev) if prev.id == last.id && prev.weight_kg == last.weight_kg => None,
        _ => Some(last.weight_kg),
    }
}

async fn lock_log(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> AppResult<(ProfileRow, Vec<WeightEntry>)> {
    let profile = ProfileRow::lock(&mut *conn, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let before = repo::list_tx(conn, user_id).await?;
    Ok((profile, before))
}

async fn sync_profile(
    conn: &mut PgConnection,
    profile: &ProfileRow,
    before: &[WeightEntry],
) -> AppResult<WeightLogState> {
    let entries = repo::list_tx(&mut *conn, profile.id).await?;
    let mut current_weight = profile.weight_kg;
    if let Some(weight) = mirrored_weight(before, &entries) {
        let budget = profile.budget_with_weight(weight);
        debug!(user_id = %profile.id, weight, recomputed = budget.is_some(), "profile weight follows log");
        profile_repo::update_weight(conn, profile.id, weight, budget).await?;
        current_weight = Some(weight);
    }
    Ok(WeightLogState {
        entries,
        current_weight,
    })
}

pub async fn append(st: &AppState, user_id: Uuid, weight_kg: f64) -> AppResult<WeightLogState> {
    let mut tx = st.db.begin().await?;
    let (profile, before) = lock_log(&mut tx, user_id).await?;
    repo::insert(&mut tx, user_id, weight_kg).await?;
    let state = sync_profile(&mut tx, &profile, &before).await?;
    tx.commit().await?;
    Ok(state)
}

pub async fn edit(
    st: &AppState,
    user_id: Uuid,
    entry_id: Uuid,
    weight_kg: f64,
) -> AppResult<WeightLogState> {
    let mut tx = st.db.begin().await?;
    let (profile, before) = lock_log(&mut tx, user_id).await?;
    repo::update(&mut tx, user_id, entry_id, weight_kg)
        .await?
        .ok_or(AppError::NotFound("Weight entry"))?;
    let state = sync_profile(&mut tx, &profile, &before).await?;
    tx.commit().await?;
    Ok(state)
}

pub async fn remove(st: &AppState, user_id: Uuid, entry_id: Uuid) -> AppResult<WeightLogState> {
    let mut tx = st.db.begin().await?;
    let (profile, before) = lock_log(&mut tx, user_id).await?;
    repo::delete(&mut tx, user_id, entry_id)
        .await?
        .ok_or(AppError::NotFound("Weight entry"))?;
    let state = sync_profile(&mut tx, &profile, &before).await?;
    tx.commit().await?;
    Ok(state)
}
