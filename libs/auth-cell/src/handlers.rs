use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;
use shared_utils::{run_blocking, AppState};

use crate::models::{LoginRequest, RegisterRequest, SessionResponse};
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AuthService::new(&state);
    let account = service.validate_registration(&request)?;
    service.check_email_available(&*state.db.read().await, &account.email)?;

    // Hash before taking the write guard; `create_account` re-checks the email.
    let hasher = service.clone();
    let password_hash = run_blocking(move || hasher.hash_password(&request.password)).await??;

    let now = state.clock.now();
    let user = {
        let mut db = state.db.write().await;
        service.create_account(&mut db, account, password_hash, now)?
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "user": user,
            "message": "Account created successfully!"
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&state);
    let credentials = service.find_credentials(&*state.db.read().await, &request)?;

    let verifier = service.clone();
    let checked = credentials.clone();
    run_blocking(move || verifier.check_password(&request.password, &checked)).await??;

    let user = {
        let mut db = state.db.write().await;
        service.start_session(&mut db, &credentials)?
    };

    Ok(Json(json!({
        "success": true,
        "message": format!("Welcome back, {}!", user.first_name()),
        "user": user
    })))
}

#[axum::debug_handler]
pub async fn logout(State(state): State<Arc<AppState>>) -> Json<Value> {
    let service = AuthService::new(&state);
    service.logout(&mut *state.db.write().await);

    Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}

#[axum::debug_handler]
pub async fn current_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, AppError> {
    debug!("Fetching current session");

    let service = AuthService::new(&state);
    let user = service.current_session(&*state.db.read().await)?;

    Ok(Json(SessionResponse::from(user)))
}
