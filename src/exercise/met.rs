//! MET (metabolic equivalent) table and the two calorie formulas built on it.

use lazy_static::lazy_static;
use regex::Regex;

/// kcal per kg per hour for activities we can estimate without the remote API.
pub const MET_VALUES: [(&str, f64); 9] = [
    ("running", 9.8),
    ("cycling", 7.5),
    ("walking", 3.8),
    ("basketball", 8.0),
    ("stair machine", 8.8),
    ("weightlifting", 5.0),
    ("swimming", 6.0),
    ("yoga", 3.0),
    ("cooking", 1.2),
];

/// Used when the profile has no weight yet.
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

lazy_static! {
    static ref MET_PATTERNS: Vec<(Regex, &'static str, f64)> = MET_VALUES
        .iter()
        .map(|(name, met)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name)))
                .expect("MET pattern is a valid regex");
            (re, *name, *met)
        })
        .collect();
}

/// First table activity that appears as a whole word in `input`.
pub fn find_met(input: &str) -> Option<(&'static str, f64)> {
    MET_PATTERNS
        .iter()
        .find(|(re, _, _)| re.is_match(input))
        .map(|(_, name, met)| (*name, *met))
}

/// Calories for a logged session: `MET * kg * hours`.
pub fn session_calories(met: f64, weight_kg: f64, minutes: f64) -> f64 {
    met * weight_kg * (minutes / 60.0)
}

/// Oxygen-uptake estimate used for table lookups: `MET * 3.5 * kg / 200` per minute.
pub fn lookup_calories(met: f64, weight_kg: f64, minutes: f64) -> f64 {
    (met * weight_kg * 3.5) / 200.0 * minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_whole_words_case_insensitively() {
        assert_eq!(find_met("Morning RUNNING by the lake"), Some(("running", 9.8)));
        assert_eq!(find_met("stair machine intervals"), Some(("stair machine", 8.8)));
        assert_eq!(find_met("yoga"), Some(("yoga", 3.0)));
    }

    #[test]
    fn partial_words_do_not_match() {
        assert_eq!(find_met("runnings"), None);
        assert_eq!(find_met("spinning"), None);
    }

    #[test]
    fn session_formula() {
        // 8 MET, 70 kg, 45 min
        assert!((session_calories(8.0, 70.0, 45.0) - 420.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_formula() {
        // 9.8 * 70 * 3.5 / 200 = 12.005 kcal/min
        assert!((lookup_calories(9.8, 70.0, 30.0) - 360.15).abs() < 1e-9);
    }
}
