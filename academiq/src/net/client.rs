//! HTTP client wrapper for the AcademIQ REST backend.
//!
//! Every backend call goes through [`ApiClient::execute`], which applies the
//! per-request timeout, attaches the bearer token, repeats transient failures
//! and walks the fallback endpoints of the request.

use super::{
    errors::{ApiError, ApiResult, error_message_from_body},
    request::{ApiRequest, AuthMode},
    timeouts::with_timeout,
};
use crate::{auth::Session, config::ClientConfig};
use bytes::Bytes;
use log::{debug, warn};
use reqwest::{StatusCode, multipart::Form};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the backend, sharing one session with the rest of the crate.
///
/// Cloning is cheap: clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Session,
    request_timeout: Duration,
    bulk_timeout: Duration,
    upload_timeout: Duration,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and timeouts
    /// * `session` - Session whose token is attached to authenticated requests
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built
    pub fn new(config: &ClientConfig, session: Session) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session,
            request_timeout: config.request_timeout,
            bulk_timeout: config.bulk_timeout,
            upload_timeout: config.upload_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn bulk_timeout(&self) -> Duration {
        self.bulk_timeout
    }

    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    /// Absolute URL for `path`; absolute URLs pass through unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Execute a request and return the raw response body
    ///
    /// # Errors
    ///
    /// Returns the error of the last endpoint tried. A 401 on a request that
    /// carried a token clears the session and yields `ApiError::Unauthorized`.
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<Bytes> {
        let candidates = request.into_candidates();
        let total = candidates.len();
        let mut last_error = None;

        for (index, candidate) in candidates.into_iter().enumerate() {
            match self.execute_with_retry(&candidate).await {
                Ok(body) => return Ok(body),
                Err(err) if index + 1 < total && err.allows_fallback() => {
                    warn!(
                        "{} {} failed ({err}), trying alternate endpoint",
                        candidate.method, candidate.path
                    );
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ApiError::InvalidRequest("No endpoint to call".to_string())))
    }

    /// Execute a request and decode the JSON response
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let path = request.path.clone();
        let body = self.execute(request).await?;
        decode(&path, &body)
    }

    /// Execute a request, ignoring the response body
    pub async fn send(&self, request: ApiRequest) -> ApiResult<()> {
        self.execute(request).await.map(|_| ())
    }

    /// Send a multipart form to `path`. Never retried.
    pub async fn send_multipart(
        &self,
        path: &str,
        form: Form,
        auth: AuthMode,
        timeout: Duration,
    ) -> ApiResult<Bytes> {
        let token = self.bearer_for(auth)?;
        let url = self.url(path);
        debug!("POST {url} (multipart)");

        let mut builder = self.http.post(&url).multipart(form).timeout(timeout);
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }
        self.dispatch(path, timeout, token.is_some(), builder).await
    }

    /// PUT a raw body to an absolute URL, such as a presigned storage URL.
    ///
    /// No bearer token is attached.
    pub async fn put_raw(
        &self,
        url: &str,
        body: reqwest::Body,
        content_type: &str,
        content_length: u64,
        timeout: Duration,
    ) -> ApiResult<()> {
        debug!("PUT {} ({content_length} bytes)", strip_query(url));
        let builder = self
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CONTENT_LENGTH, content_length)
            .body(body)
            .timeout(timeout);
        self.dispatch(strip_query(url), timeout, false, builder)
            .await
            .map(|_| ())
    }

    async fn execute_with_retry(&self, request: &ApiRequest) -> ApiResult<Bytes> {
        let max_attempts = request.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.send_once(request, attempt).await {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    warn!(
                        "{} {} attempt {attempt}/{max_attempts} failed: {err}",
                        request.method, request.path
                    );
                    tokio::time::sleep(request.retry.delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, request: &ApiRequest, attempt: u32) -> ApiResult<Bytes> {
        let timeout = request.timeout.unwrap_or(self.request_timeout);
        let token = self.bearer_for(request.auth)?;
        let url = self.url(&request.path);
        debug!("{} {url} (attempt {attempt})", request.method);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }

        self.dispatch(&request.path, timeout, token.is_some(), builder)
            .await
    }

    /// Send, check the status and read the body under one timer
    async fn dispatch(
        &self,
        path: &str,
        timeout: Duration,
        sent_token: bool,
        builder: reqwest::RequestBuilder,
    ) -> ApiResult<Bytes> {
        with_timeout(path, timeout, async {
            let response = builder
                .send()
                .await
                .map_err(|e| ApiError::from_reqwest(path, timeout, e))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::from_reqwest(path, timeout, e))?;

            if status.is_success() {
                return Ok(body);
            }

            if status == StatusCode::UNAUTHORIZED && sent_token {
                warn!("{path} rejected the bearer token");
                self.session.invalidate();
                return Err(ApiError::Unauthorized);
            }

            Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message_from_body(&body),
            })
        })
        .await
    }

    fn bearer_for(&self, auth: AuthMode) -> ApiResult<Option<String>> {
        match auth {
            AuthMode::None => Ok(None),
            AuthMode::Optional => Ok(self.session.token()),
            AuthMode::Required => self
                .session
                .token()
                .map(Some)
                .ok_or(ApiError::NotAuthenticated),
        }
    }
}

/// Decode a JSON body, naming the endpoint in the error
pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
}

/// URL without its query string
pub(crate) fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
