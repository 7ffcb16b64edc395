mod dto;
pub mod handlers;
pub mod lookup;
pub mod met;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub use repo_types::Exercise;

pub fn router() -> Router<AppState> {
    handlers::exercise_routes()
}
