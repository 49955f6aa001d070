pub mod health;
pub mod query;
pub mod sessions;
pub mod variants;

use claims_engine::ClaimsResult;

use crate::error::{ApiError, ApiResult};

/// Run synchronous core work on the blocking pool
pub(crate) async fn run_blocking<T, F>(task: F) -> ApiResult<T>
where
    F: FnOnce() -> ClaimsResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::internal(format!("worker task failed: {e}")))?
        .map_err(ApiError::from)
}
