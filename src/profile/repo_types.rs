use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::energy::{ActivityLevel, BudgetError, EnergyBudget, Gender, Goal, ProfileDraft};

/// Profile part of a user record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub is_setup_complete: bool,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: String,
    pub goal: String,
    pub rate: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
}

impl ProfileRow {
    /// Stored attributes as calculator input. Fails only on text that no longer
    /// matches an enum variant.
    pub fn draft(&self) -> Result<ProfileDraft, BudgetError> {
        Ok(ProfileDraft {
            age: self.age.and_then(|a| u32::try_from(a).ok()),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            gender: self.gender.as_deref().map(str::parse::<Gender>).transpose()?,
            activity_level: Some(self.activity_level.parse::<ActivityLevel>()?),
            goal: Some(self.goal.parse::<Goal>()?),
            rate: self.rate,
        })
    }

    /// Budget recomputed in full with a new weight. `None` until setup is
    /// complete, since the remaining attributes are not known yet.
    pub fn budget_with_weight(&self, weight_kg: f64) -> Option<EnergyBudget> {
        if !self.is_setup_complete {
            return None;
        }
        let recomputed = self.draft().and_then(|mut draft| {
            draft.weight_kg = Some(weight_kg);
            draft.validate()
        });
        match recomputed {
            Ok(profile) => Some(profile.budget()),
            Err(e) => {
                warn!(user_id = %self.id, error = %e, "stored profile is invalid; budget left unchanged");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            username: "ana".into(),
            is_setup_complete: true,
            age: Some(41),
            height_cm: Some(168.0),
            weight_kg: Some(64.5),
            gender: Some("female".into()),
            activity_level: "very_active".into(),
            goal: "gain".into(),
            rate: Some(5.0),
            target_weight_kg: None,
            bmr: None,
            tdee: None,
        }
    }

    #[test]
    fn stored_text_becomes_typed_draft() {
        let d = row().draft().expect("parses");
        assert_eq!(d.gender, Some(Gender::Female));
        assert_eq!(d.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(d.goal, Some(Goal::Gain));
        assert_eq!(d.age, Some(41));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn fresh_account_draft_is_incomplete() {
        let r = ProfileRow {
            age: None,
            height_cm: None,
            weight_kg: None,
            gender: None,
            activity_level: "sedentary".into(),
            goal: "maintain".into(),
            rate: None,
            ..row()
        };
        assert!(r.draft().expect("parses").validate().is_err());
    }

    #[test]
    fn new_weight_recomputes_whole_budget() {
        let r = row();
        let before = r.draft().unwrap().validate().unwrap().budget();
        let after = r.budget_with_weight(60.5).expect("complete profile");
        assert!((before.bmr - after.bmr - 40.0).abs() < 1e-9);
        assert!(after.tdee < before.tdee);
    }

    #[test]
    fn incomplete_setup_has_no_budget() {
        let r = ProfileRow { is_setup_complete: false, ..row() };
        assert_eq!(r.budget_with_weight(70.0), None);
    }

    #[test]
    fn corrupt_enum_text_is_reported() {
        let r = ProfileRow { goal: "bulk".into(), ..row() };
        assert!(r.draft().is_err());
    }

    #[test]
    fn corrupt_stored_profile_yields_no_budget() {
        let r = ProfileRow { activity_level: "couch".into(), ..row() };
        assert_eq!(r.budget_with_weight(70.0), None);
        let r = ProfileRow { age: Some(-5), ..row() };
        assert_eq!(r.budget_with_weight(70.0), None);
    }
}
