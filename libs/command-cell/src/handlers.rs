use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use tracing::info;

use shared_models::error::AppError;
use shared_utils::{run_blocking, AppState};

use crate::commands::{Command, Outcome};
use crate::dispatch::Dispatcher;

/// Executes one command under the write lock, so each command sees and
/// leaves a consistent state. Runs on the blocking pool since `register` and
/// `login` hash passwords.
#[axum::debug_handler]
pub async fn execute_command(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(command), _): WithRejection<Json<Command>, AppError>,
) -> Result<Json<Outcome>, AppError> {
    info!(mutation = command.is_mutation(), "Executing command: {}", command.name());

    let dispatcher = Dispatcher::new(&state);
    let outcome = run_blocking(move || {
        let mut db = state.db.blocking_write();
        dispatcher.dispatch(&mut db, command, state.clock.as_ref())
    })
    .await??;

    Ok(Json(outcome))
}
