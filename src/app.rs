use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/submit", post(handlers::submit_form))
        .route("/reset", post(handlers::reset_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/scores", get(handlers::get_scores))
        .route("/api/series", get(handlers::get_series))
        .route("/api/submit", post(handlers::submit))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
