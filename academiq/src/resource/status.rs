//! Observable store status.

use crate::net::errors::{ApiError, ApiResult};
use log::warn;
use std::{
    future::Future,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

#[derive(Debug, Default)]
struct StatusInner {
    in_flight: AtomicUsize,
    error: Mutex<Option<String>>,
    success: Mutex<Option<String>>,
}

/// `loading` flag plus last error and success messages of a store.
///
/// Clones observe the same status, so a caller can watch an operation that
/// is still running.
#[derive(Debug, Clone, Default)]
pub struct StoreStatus {
    inner: Arc<StatusInner>,
}

impl StoreStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an operation is in flight
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire) > 0
    }

    pub fn error_message(&self) -> Option<String> {
        lock(&self.inner.error).clone()
    }

    pub fn success_message(&self) -> Option<String> {
        lock(&self.inner.success).clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        *lock(&self.inner.error) = Some(message.into());
    }

    pub fn set_success(&self, message: impl Into<String>) {
        *lock(&self.inner.success) = Some(message.into());
    }

    pub fn clear(&self) {
        *lock(&self.inner.error) = None;
        *lock(&self.inner.success) = None;
    }

    /// Mark an operation as started and clear previous messages.
    ///
    /// `loading` stays set until the returned guard is dropped, which also
    /// happens when the operation's future is cancelled.
    pub fn begin(&self) -> LoadingGuard {
        self.clear();
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        LoadingGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Record `err` as the current error message
    pub fn record(&self, err: &ApiError) {
        warn!("{err}");
        self.set_error(err.user_message());
    }

    /// Run a read; on failure record the error and return `None`
    pub(crate) async fn read<T>(&self, operation: impl Future<Output = ApiResult<T>>) -> Option<T> {
        let _loading = self.begin();
        match operation.await {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(&err);
                None
            }
        }
    }

    /// Run a mutation; on failure record the error and return it
    pub(crate) async fn mutate<T>(
        &self,
        operation: impl Future<Output = ApiResult<T>>,
    ) -> ApiResult<T> {
        let _loading = self.begin();
        operation.await.inspect_err(|err| self.record(err))
    }
}

/// Resets `loading` when dropped
#[must_use = "loading is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    inner: Arc<StatusInner>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
