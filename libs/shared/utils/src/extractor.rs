use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_models::error::AppError;

use crate::state::AppState;

/// Rejects the request with 401 unless a session is active, and exposes the
/// session user to handlers as a request extension.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = state
        .db
        .read()
        .await
        .session()
        .cloned()
        .ok_or(AppError::SessionRequired)?;

    debug!("Request from session user {}", session.id);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
