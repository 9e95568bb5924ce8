pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            post(handlers::handle_generate).get(handlers::handle_list),
        )
        .route(
            "/api/v1/resumes/:stored_name",
            get(handlers::handle_download),
        )
        .with_state(state)
}
