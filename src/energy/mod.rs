//! Energy budget calculator: BMR, TDEE and macro targets from profile attributes.
//!
//! Everything here is pure arithmetic over validated input and has no
//! knowledge of storage or HTTP.

mod budget;
mod profile;

pub use budget::{EnergyBudget, MacroTargets};
pub use profile::{ActivityLevel, BudgetError, Gender, Goal, Profile, ProfileDraft};
