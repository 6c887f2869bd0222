use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/tickets/reconcile", get(handlers::reconcile))
        .route("/api/shifts", get(handlers::list_shifts).post(handlers::open_shift))
        .route("/api/shifts/current", get(handlers::current_shift))
        .route("/api/shifts/:id", get(handlers::get_shift))
        .route("/api/shifts/:id/close", post(handlers::close_shift))
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state)
}
