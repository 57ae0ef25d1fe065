use std::sync::Arc;

use axum::{routing::post, Router};

use shared_utils::AppState;

use crate::handlers;

pub fn command_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::execute_command))
        .with_state(state)
}
