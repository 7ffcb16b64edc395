pub mod client;
mod dto;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use client::{Advisor, GeminiAdvisor};

pub fn router() -> Router<AppState> {
    handlers::advice_routes()
}
