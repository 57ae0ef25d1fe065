use tracing::error;

use shared_models::error::AppError;

/// Runs CPU-heavy work (password hashing) on tokio's blocking pool.
pub async fn run_blocking<F, T>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!("Blocking task failed: {}", e);
        AppError::Internal(e.to_string())
    })
}
