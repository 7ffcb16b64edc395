use serde::Serialize;

use super::profile::{Gender, Goal, Profile};

const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

const CARBS_SHARE: f64 = 0.5;
const PROTEIN_SHARE: f64 = 0.3;
const FAT_SHARE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBudget {
    pub bmr: f64,
    pub tdee: f64,
}

/// Daily macro targets in grams. Derived from tdee on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroTargets {
    pub carbs_g: i64,
    pub protein_g: i64,
    pub fat_g: i64,
}

impl Profile {
    /// Mifflin-St Jeor. Female and other share the -161 offset.
    pub fn bmr(&self) -> f64 {
        let s = match self.gender {
            Gender::Male => 5.0,
            Gender::Female | Gender::Other => -161.0,
        };
        10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * f64::from(self.age) + s
    }

    /// Recomputes both values from scratch.
    pub fn budget(&self) -> EnergyBudget {
        let bmr = self.bmr();
        let mut tdee = bmr * self.activity_level.multiplier();
        let rate = self.rate.unwrap_or(0.0);
        match self.goal {
            Goal::Lose => tdee -= tdee * (rate / 100.0),
            Goal::Gain => tdee += tdee * (rate / 100.0),
            Goal::Maintain => {}
        }
        EnergyBudget { bmr, tdee }
    }
}

impl MacroTargets {
    pub fn from_tdee(tdee: f64) -> Self {
        Self {
            carbs_g: (tdee * CARBS_SHARE / KCAL_PER_G_CARBS).round() as i64,
            protein_g: (tdee * PROTEIN_SHARE / KCAL_PER_G_PROTEIN).round() as i64,
            fat_g: (tdee * FAT_SHARE / KCAL_PER_G_FAT).round() as i64,
        }
    }
}
