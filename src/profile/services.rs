use tracing::debug;
use uuid::Uuid;

use super::{repo, repo_types::ProfileRow};
use crate::{
    energy::{EnergyBudget, Profile},
    error::{AppError, AppResult},
    state::AppState,
    weight::repo as weight_repo,
};

/// The setup weight becomes a log entry unless the log already ends with it,
/// so the profile weight keeps mirroring the latest entry.
pub(crate) fn needs_log_entry(latest_logged: Option<f64>, weight_kg: f64) -> bool {
    latest_logged != Some(weight_kg)
}

pub async fn complete_setup(
    st: &AppState,
    user_id: Uuid,
    profile: &Profile,
    budget: &EnergyBudget,
) -> AppResult<()> {
    let mut tx = st.db.begin().await?;
    ProfileRow::lock(&mut tx, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let latest = weight_repo::list_tx(&mut tx, user_id)
        .await?
        .last()
        .map(|e| e.weight_kg);
    if needs_log_entry(latest, profile.weight_kg) {
        debug!(%user_id, weight = profile.weight_kg, "setup weight appended to log");
        weight_repo::insert(&mut tx, user_id, profile.weight_kg).await?;
    }

    if !repo::save_setup(&mut tx, user_id, profile, budget).await? {
        return Err(AppError::NotFound("User"));
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log_gets_the_setup_weight() {
        assert!(needs_log_entry(None, 80.0));
    }

    #[test]
    fn changed_weight_is_logged() {
        assert!(needs_log_entry(Some(80.0), 75.0));
    }

    #[test]
    fn matching_tail_is_not_duplicated() {
        assert!(!needs_log_entry(Some(75.0), 75.0));
    }
}
