//! Login, registration and logout against `/Auth`.

use super::{
    models::{AuthResponse, Credentials, Registration, User},
    session::Session,
};
use crate::{
    net::{
        client::ApiClient,
        errors::{ApiError, ApiResult},
        request::ApiRequest,
    },
    resource::StoreStatus,
};
use log::info;

/// Authentication manager
///
/// Drives the shared [`Session`]: a successful login or registration starts
/// it, a failed one leaves it cleared.
#[derive(Debug, Clone)]
pub struct AuthManager {
    client: ApiClient,
    status: StoreStatus,
}

impl AuthManager {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
        }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// Load the persisted session without contacting the backend
    pub fn restore(&self) -> bool {
        self.session().restore()
    }

    /// Log in with email and password
    ///
    /// # Arguments
    ///
    /// * `credentials` - Email and password
    ///
    /// # Returns
    ///
    /// * `ApiResult<User>` - Logged-in user
    ///
    /// # Errors
    ///
    /// Any backend error; the session is cleared and the error message set
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        let request = ApiRequest::post("/Auth/login").json(credentials)?;
        let result = self
            .authenticate(request, |response| {
                User::from_auth(response, &credentials.email)
            })
            .await;
        self.finish(result, "Invalid credentials")
    }

    /// Register a new account and log it in
    ///
    /// # Errors
    ///
    /// Any backend error; the session is cleared and the error message set
    pub async fn register(&self, registration: &Registration) -> ApiResult<User> {
        let request = ApiRequest::post("/Auth/registro").json(registration)?;
        let result = self
            .authenticate(request, |response| {
                let mut user = User::from_auth(response, &registration.email);
                user.last_name = registration.last_name.clone();
                user.phone = registration.phone.clone();
                if let Some(role) = registration.role {
                    user.role = role;
                }
                user
            })
            .await;
        self.finish(result, "Registration failed")
    }

    /// Clear the session; never contacts the backend
    pub fn logout(&self) {
        self.status.clear();
        self.session().logout();
    }

    /// Replace the session user after a profile edit
    pub fn update_user(&self, user: User) {
        self.session().update_user(user);
    }

    async fn authenticate(
        &self,
        request: ApiRequest,
        to_user: impl FnOnce(&AuthResponse) -> User,
    ) -> ApiResult<User> {
        let _loading = self.status.begin();
        let response: AuthResponse = self.client.json(request).await?;
        if response.token.is_empty() {
            return Err(ApiError::Decode("Response carried an empty token".to_string()));
        }
        let user = to_user(&response);
        self.session().start(user.clone(), response.token);
        info!("Logged in as user {}", user.id);
        Ok(user)
    }

    fn finish(&self, result: ApiResult<User>, fallback_message: &str) -> ApiResult<User> {
        if let Err(err) = &result {
            self.session().logout();
            self.status.record(err);
            if matches!(err, ApiError::Status { message, .. } if message.is_empty()) {
                self.status.set_error(fallback_message);
            }
        }
        result
    }
}
