use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    client::AdvisorError,
    dto::{MacroGrams, RecommendationRequest, RecommendationResponse},
};
use crate::{
    auth::AuthUser,
    energy::{Goal, MacroTargets},
    error::{AppError, AppResult},
    profile::ProfileRow,
    state::AppState,
};

pub fn advice_routes() -> Router<AppState> {
    Router::new().route("/ai-recommendation", post(recommend))
}

impl From<AdvisorError> for AppError {
    fn from(e: AdvisorError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl From<MacroTargets> for MacroGrams {
    fn from(m: MacroTargets) -> Self {
        MacroGrams {
            protein: m.protein_g as f64,
            carbs: m.carbs_g as f64,
            fat: m.fat_g as f64,
        }
    }
}

pub(crate) fn build_prompt(goal: Goal, macros: MacroGrams, question: &str) -> String {
    format!(
        "You are a fitness and nutrition expert. The user is trying to {goal} weight.\n\
         Their target macros per day are:\n\
         - Protein: {}g\n\
         - Carbs: {}g\n\
         - Fat: {}g\n\n\
         Here's their question: {question}\n\n\
         Please give a clear, short recommendation (max 2 sentences).",
        macros.protein, macros.carbs, macros.fat,
    )
}

#[instrument(skip(state, payload))]
pub async fn recommend(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(payload) = payload?;
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question is required".into()));
    }

    let (goal, macros) = match (payload.user_goal, payload.user_macros) {
        (Some(goal), Some(macros)) => (goal, macros),
        (goal, macros) => {
            let profile = ProfileRow::find(&state.db, user_id)
                .await?
                .ok_or(AppError::NotFound("User"))?;
            let goal = match goal {
                Some(g) => g,
                None => profile
                    .goal
                    .parse::<Goal>()
                    .map_err(|e| AppError::Internal(e.into()))?,
            };
            let macros = match macros.or_else(|| profile.tdee.map(|t| MacroTargets::from_tdee(t).into())) {
                Some(m) => m,
                None => {
                    warn!(%user_id, "no macros supplied and profile has no tdee");
                    return Err(AppError::Validation(
                        "Complete setup or send userMacros".into(),
                    ));
                }
            };
            (goal, macros)
        }
    };

    let answer = state
        .advisor
        .recommend(&build_prompt(goal, macros, question))
        .await?;
    info!(%user_id, %goal, "advisor answered");
    Ok(Json(RecommendationResponse { message: answer }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_goal_macros_and_question() {
        let prompt = build_prompt(
            Goal::Lose,
            MacroGrams {
                protein: 150.0,
                carbs: 250.0,
                fat: 44.0,
            },
            "Is oatmeal fine before a run?",
        );
        assert!(prompt.contains("trying to lose weight"));
        assert!(prompt.contains("Protein: 150g"));
        assert!(prompt.contains("Carbs: 250g"));
        assert!(prompt.contains("Fat: 44g"));
        assert!(prompt.contains("Is oatmeal fine before a run?"));
        assert!(prompt.contains("max 2 sentences"));
    }

    #[test]
    fn profile_macros_convert_to_grams() {
        let grams = MacroGrams::from(MacroTargets::from_tdee(2000.0));
        assert_eq!(
            grams,
            MacroGrams {
                protein: 150.0,
                carbs: 250.0,
                fat: 44.0,
            }
        );
    }

    #[test]
    fn advisor_failures_are_upstream() {
        let err: AppError = AdvisorError::Status(503).into();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
