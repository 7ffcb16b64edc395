use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::met::{find_met, lookup_calories};
use crate::{
    config::ActivityApiConfig,
    error::{AppError, AppResult},
};

/// Minutes used when the caller gives no usable duration.
pub const DEFAULT_MINUTES: f64 = 30.0;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("activity API key is not configured")]
    NotConfigured,
    #[error("activity API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("activity API answered with status {0}")]
    Status(u16),
}

/// Burn rate reported for a named activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBurn {
    pub name: String,
    pub kcal_per_minute: f64,
}

#[async_trait]
pub trait CalorieBurnSource: Send + Sync {
    /// `Ok(None)` when the service knows no such activity.
    async fn burn_rate(&self, activity: &str) -> Result<Option<ActivityBurn>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct NinjasActivity {
    name: String,
    total_calories: f64,
    duration_minutes: f64,
}

/// api-ninjas `caloriesburned` endpoint.
pub struct NinjasClient {
    client: Client,
    config: ActivityApiConfig,
}

impl NinjasClient {
    pub fn new(config: ActivityApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CalorieBurnSource for NinjasClient {
    #[instrument(skip(self))]
    async fn burn_rate(&self, activity: &str) -> Result<Option<ActivityBurn>, LookupError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LookupError::NotConfigured)?;
        let res = self
            .client
            .get(format!(
                "{}/caloriesburned",
                self.config.base_url.trim_end_matches('/')
            ))
            .header("X-Api-Key", key)
            .query(&[("activity", activity)])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(LookupError::Status(res.status().as_u16()));
        }
        let found: Vec<NinjasActivity> = res.json().await?;
        Ok(found
            .into_iter()
            .find(|a| a.duration_minutes > 0.0 && a.total_calories.is_finite())
            .map(|a| ActivityBurn {
                kcal_per_minute: a.total_calories / a.duration_minutes,
                name: a.name,
            }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    Api,
    MetTable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieEstimate {
    pub exercise_name: String,
    pub duration: f64,
    pub calories_burned: f64,
    pub source: EstimateSource,
}

pub fn effective_minutes(minutes: Option<f64>) -> f64 {
    minutes
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(DEFAULT_MINUTES)
}

/// Remote lookup first; any upstream failure or empty answer falls back to the MET table.
pub async fn estimate(
    source: &dyn CalorieBurnSource,
    activity: &str,
    minutes: f64,
    weight_kg: f64,
) -> AppResult<CalorieEstimate> {
    let activity = activity.trim();
    if activity.is_empty() {
        return Err(AppError::Validation("activity is required".into()));
    }

    match source.burn_rate(&activity.to_lowercase()).await {
        Ok(Some(burn)) => {
            debug!(activity, name = %burn.name, "calorie rate from API");
            return Ok(CalorieEstimate {
                exercise_name: burn.name,
                duration: minutes,
                calories_burned: burn.kcal_per_minute * minutes,
                source: EstimateSource::Api,
            });
        }
        Ok(None) => debug!(activity, "activity unknown to API; using MET table"),
        Err(e) => warn!(error = %e, activity, "activity API failed; using MET table"),
    }

    let (name, met) = find_met(activity).ok_or(AppError::NotFound("Exercise"))?;
    Ok(CalorieEstimate {
        exercise_name: name.to_string(),
        duration: minutes,
        calories_burned: lookup_calories(met, weight_kg, minutes),
        source: EstimateSource::MetTable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Fake {
        Known(f64),
        Unknown,
        Down,
    }

    #[async_trait]
    impl CalorieBurnSource for Fake {
        async fn burn_rate(&self, activity: &str) -> Result<Option<ActivityBurn>, LookupError> {
            match self {
                Fake::Known(rate) => Ok(Some(ActivityBurn {
                    name: format!("{activity} (api)"),
                    kcal_per_minute: *rate,
                })),
                Fake::Unknown => Ok(None),
                Fake::Down => Err(LookupError::Status(503)),
            }
        }
    }

    #[tokio::test]
    async fn api_rate_is_scaled_to_duration() {
        let e = estimate(&Fake::Known(10.0), "Rowing", 45.0, 80.0).await.unwrap();
        assert_eq!(e.source, EstimateSource::Api);
        assert_eq!(e.exercise_name, "rowing (api)");
        assert!((e.calories_burned - 450.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn upstream_failure_falls_back_to_met_table() {
        let e = estimate(&Fake::Down, "easy running", 30.0, 70.0).await.unwrap();
        assert_eq!(e.source, EstimateSource::MetTable);
        assert_eq!(e.exercise_name, "running");
        assert!((e.calories_burned - 360.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_answer_falls_back_to_met_table() {
        let e = estimate(&Fake::Unknown, "Yoga", 60.0, 60.0).await.unwrap();
        assert_eq!(e.source, EstimateSource::MetTable);
        assert!((e.calories_burned - 189.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_everywhere_is_not_found() {
        let err = estimate(&Fake::Down, "quidditch", 30.0, 70.0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_activity_is_rejected() {
        let err = estimate(&Fake::Unknown, "  ", 30.0, 70.0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn duration_defaults_to_thirty_minutes() {
        assert_eq!(effective_minutes(None), 30.0);
        assert_eq!(effective_minutes(Some(0.0)), 30.0);
        assert_eq!(effective_minutes(Some(-4.0)), 30.0);
        assert_eq!(effective_minutes(Some(20.0)), 20.0);
    }

    #[tokio::test]
    async fn unconfigured_client_reports_without_network() {
        let client = NinjasClient::new(crate::config::AppConfig::for_tests().activity_api)
            .expect("client builds");
        let err = client.burn_rate("running").await.unwrap_err();
        assert!(matches!(err, LookupError::NotConfigured));
    }
}
