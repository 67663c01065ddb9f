//! Request timeout helpers
//!
//! Every request is raced against its own timer so a slow endpoint cannot
//! stall unrelated work.

use super::errors::{ApiError, ApiResult};
use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for ordinary requests (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for bulk writes such as creating many bookmarks (15 seconds)
pub const BULK_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for file uploads (10 minutes)
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Execute a request future with a timeout
///
/// # Arguments
///
/// * `path` - Endpoint path, used in the timeout error
/// * `duration` - Timeout duration
/// * `future` - Request to execute
///
/// # Returns
///
/// * `ApiResult<T>` - Result of the future or `ApiError::Timeout`
pub async fn with_timeout<F, T>(path: &str, duration: Duration, future: F) -> ApiResult<T>
where
    F: std::future::Future<Output = ApiResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout {
            path: path.to_string(),
            timeout: duration,
        }),
    }
}
