//! Request descriptions consumed by [`ApiClient`](super::client::ApiClient).

use super::errors::{ApiError, ApiResult};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;

/// Whether a request carries the session's bearer token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Never attach the token
    #[default]
    None,
    /// Attach the token when a session exists
    Optional,
    /// Fail with `ApiError::NotAuthenticated` when there is no session
    Required,
}

/// How often to repeat a request that failed transiently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per endpoint, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no repetition
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Up to `max_attempts` tries with a fixed pause between them
    pub fn attempts(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// A single backend call: method, path, body, timeout and retry policy.
///
/// Fallback requests are tried in order when the primary one fails with a
/// transient error or a 404/405, which covers endpoints that exist under
/// more than one casing or shape.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) retry: RetryPolicy,
    pub(crate) auth: AuthMode,
    pub(crate) fallbacks: Vec<ApiRequest>,
}

impl ApiRequest {
    /// Create a request for `path`, relative to the configured base URL
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
            retry: RetryPolicy::none(),
            auth: AuthMode::None,
            fallbacks: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the body cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Override the client's default request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Add a complete alternative request
    pub fn fallback(mut self, alternative: ApiRequest) -> Self {
        self.fallbacks.push(alternative);
        self
    }

    /// Add an alternative that differs only in its path.
    ///
    /// Copies everything configured so far, so call it last.
    pub fn alternate_path(self, path: impl Into<String>) -> Self {
        let mut alternative = self.clone();
        alternative.path = path.into();
        alternative.fallbacks.clear();
        self.fallback(alternative)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Primary request followed by its fallbacks, flattened.
    pub(crate) fn into_candidates(mut self) -> Vec<ApiRequest> {
        let fallbacks = std::mem::take(&mut self.fallbacks);
        let mut candidates = Vec::with_capacity(1 + fallbacks.len());
        candidates.push(self);
        for fallback in fallbacks {
            candidates.extend(fallback.into_candidates());
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ApiRequest::get("/Curso");
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.timeout, None);
        assert_eq!(request.retry.max_attempts, 1);
        assert_eq!(request.auth, AuthMode::None);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_alternate_path_copies_configuration() {
        let request = ApiRequest::post("/pregunta")
            .json(&serde_json::json!({"orden": 1}))
            .unwrap()
            .timeout(Duration::from_secs(15))
            .auth(AuthMode::Required)
            .alternate_path("/Pregunta");

        let candidates = request.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].path(), "/pregunta");
        assert_eq!(candidates[1].path(), "/Pregunta");
        assert_eq!(candidates[1].timeout, Some(Duration::from_secs(15)));
        assert_eq!(candidates[1].auth, AuthMode::Required);
        assert_eq!(candidates[1].body, candidates[0].body);
    }

    #[test]
    fn test_candidates_keep_order() {
        let request = ApiRequest::delete("/UsuarioCurso/1/2")
            .fallback(
                ApiRequest::delete("/UsuarioCurso")
                    .query("idUsuario", 1)
                    .query("idCurso", 2),
            )
            .fallback(ApiRequest::post("/UsuarioCurso/delete"));

        let paths: Vec<_> = request
            .into_candidates()
            .iter()
            .map(|r| r.path().to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["/UsuarioCurso/1/2", "/UsuarioCurso", "/UsuarioCurso/delete"]
        );
    }

    #[test]
    fn test_retry_policy_never_zero_attempts() {
        assert_eq!(RetryPolicy::attempts(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::default(), RetryPolicy::none());
    }
}
