//! Rule-based dashboard alerts over the last two weeks of logs.

pub mod alerts;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::summary_routes()
}
