use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BudgetError {
    #[error("All fields are required: {0} is missing")]
    Missing(&'static str),
    #[error("Invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Unknown {field} value: {value}")]
    UnknownVariant { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = BudgetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| BudgetError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(Gender, "gender", [Gender::Male, Gender::Female, Gender::Other]);
text_enum!(
    ActivityLevel,
    "activityLevel",
    [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ]
);
text_enum!(Goal, "goal", [Goal::Lose, Goal::Maintain, Goal::Gain]);

pub const MAX_AGE: u32 = 150;
pub const MAX_HEIGHT_CM: f64 = 300.0;
pub const MAX_WEIGHT_KG: f64 = 700.0;

/// A profile that passed validation. Only constructed through [`ProfileDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    /// Percent adjustment; `None` exactly when `goal` is `Maintain`.
    pub rate: Option<f64>,
}

/// Profile attributes as they arrive from a request or a stored row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub rate: Option<f64>,
}

impl ProfileDraft {
    pub fn validate(self) -> Result<Profile, BudgetError> {
        let age = self.age.ok_or(BudgetError::Missing("age"))?;
        if age == 0 {
            return Err(BudgetError::Missing("age"));
        }
        if age > MAX_AGE {
            return Err(BudgetError::Invalid {
                field: "age",
                reason: "out of range",
            });
        }
        let height_cm = at_most("height", positive("height", self.height_cm)?, MAX_HEIGHT_CM)?;
        let weight_kg = at_most("weight", positive("weight", self.weight_kg)?, MAX_WEIGHT_KG)?;
        let gender = self.gender.ok_or(BudgetError::Missing("gender"))?;
        let activity_level = self
            .activity_level
            .ok_or(BudgetError::Missing("activityLevel"))?;
        let goal = self.goal.ok_or(BudgetError::Missing("goal"))?;

        let rate = match goal {
            Goal::Maintain => None,
            Goal::Lose | Goal::Gain => {
                let rate = positive("rate", self.rate)?;
                if rate >= 100.0 {
                    return Err(BudgetError::Invalid {
                        field: "rate",
                        reason: "must be below 100 percent",
                    });
                }
                Some(rate)
            }
        };

        Ok(Profile {
            age,
            height_cm,
            weight_kg,
            gender,
            activity_level,
            goal,
            rate,
        })
    }
}

fn at_most(field: &'static str, value: f64, max: f64) -> Result<f64, BudgetError> {
    if value > max {
        return Err(BudgetError::Invalid {
            field,
            reason: "out of range",
        });
    }
    Ok(value)
}

fn positive(field: &'static str, value: Option<f64>) -> Result<f64, BudgetError> {
    match value {
        None => Err(BudgetError::Missing(field)),
        Some(v) if v == 0.0 => Err(BudgetError::Missing(field)),
        Some(v) if !v.is_finite() || v < 0.0 => Err(BudgetError::Invalid {
            field,
            reason: "must be a positive number",
        }),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            age: Some(30),
            height_cm: Some(175.0),
            weight_kg: Some(70.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::ModeratelyActive),
            goal: Some(Goal::Lose),
            rate: Some(20.0),
        }
    }

    #[test]
    fn accepts_complete_draft() {
        let p = draft().validate().expect("valid profile");
        assert_eq!(p.rate, Some(20.0));
        assert_eq!(p.goal, Goal::Lose);
    }

    #[test]
    fn zero_counts_as_missing() {
        let d = ProfileDraft { height_cm: Some(0.0), ..draft() };
        assert_eq!(d.validate(), Err(BudgetError::Missing("height")));
        let d = ProfileDraft { age: Some(0), ..draft() };
        assert_eq!(d.validate(), Err(BudgetError::Missing("age")));
    }

    #[test]
    fn rejects_negative_and_non_finite_numbers() {
        let d = ProfileDraft { weight_kg: Some(-3.0), ..draft() };
        assert!(matches!(d.validate(), Err(BudgetError::Invalid { field: "weight", .. })));
        let d = ProfileDraft { height_cm: Some(f64::NAN), ..draft() };
        assert!(matches!(d.validate(), Err(BudgetError::Invalid { field: "height", .. })));
    }

    #[test]
    fn rejects_implausible_magnitudes() {
        let d = ProfileDraft { age: Some(3_000_000_000), ..draft() };
        assert!(matches!(d.validate(), Err(BudgetError::Invalid { field: "age", .. })));
        let d = ProfileDraft { height_cm: Some(1e308), ..draft() };
        assert!(matches!(d.validate(), Err(BudgetError::Invalid { field: "height", .. })));
        let d = ProfileDraft { weight_kg: Some(MAX_WEIGHT_KG + 1.0), ..draft() };
        assert!(matches!(d.validate(), Err(BudgetError::Invalid { field: "weight", .. })));
    }

    #[test]
    fn largest_accepted_profile_has_finite_budget() {
        let d = ProfileDraft {
            age: Some(MAX_AGE),
            height_cm: Some(MAX_HEIGHT_CM),
            weight_kg: Some(MAX_WEIGHT_KG),
            activity_level: Some(ActivityLevel::ExtraActive),
            goal: Some(Goal::Gain),
            rate: Some(99.0),
            ..draft()
        };
        let budget = d.validate().expect("within bounds").budget();
        assert!(budget.bmr.is_finite() && budget.tdee.is_finite());
    }

    #[test]
    fn rate_required_unless_maintaining() {
        let d = ProfileDraft { rate: None, ..draft() };
        assert_eq!(d.validate(), Err(BudgetError::Missing("rate")));

        let d = ProfileDraft { rate: None, goal: Some(Goal::Maintain), ..draft() };
        let p = d.validate().expect("maintain needs no rate");
        assert_eq!(p.rate, None);
    }

    #[test]
    fn rate_is_dropped_when_maintaining() {
        let d = ProfileDraft { goal: Some(Goal::Maintain), rate: Some(15.0), ..draft() };
        assert_eq!(d.validate().expect("valid").rate, None);
    }

    #[test]
    fn rate_of_hundred_percent_is_rejected() {
        let d = ProfileDraft { rate: Some(100.0), ..draft() };
        assert!(matches!(d.validate(), Err(BudgetError::Invalid { field: "rate", .. })));
    }

    #[test]
    fn enums_parse_from_stored_text() {
        assert_eq!("very_active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("gain".parse::<Goal>(), Ok(Goal::Gain));
        assert!(matches!(
            "couch_potato".parse::<ActivityLevel>(),
            Err(BudgetError::UnknownVariant { field: "activityLevel", .. })
        ));
    }

    #[test]
    fn unknown_activity_level_is_rejected_by_serde() {
        let res: Result<ActivityLevel, _> = serde_json::from_str("\"hyper_active\"");
        assert!(res.is_err());
        let ok: ActivityLevel = serde_json::from_str("\"lightly_active\"").unwrap();
        assert_eq!(ok, ActivityLevel::LightlyActive);
    }
}
