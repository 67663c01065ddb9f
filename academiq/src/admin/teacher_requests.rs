//! Teacher role requests backed by `/PeticionProfesor`.

use super::models::{
    NewTeacherRequest, PENDING, TeacherApplication, TeacherRequest, TeacherRequestId,
    TeacherRequestView,
};
use crate::{
    net::{
        client::ApiClient,
        errors::{ApiError, ApiResult},
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};

#[derive(Debug, Clone)]
pub struct TeacherRequestStore {
    client: ApiClient,
    status: StoreStatus,
    requests: ResourceCache<TeacherRequest>,
}

impl TeacherRequestStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            requests: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn requests(&self) -> &[TeacherRequest] {
        self.requests.items()
    }

    /// Ask for the teacher role as the logged-in user
    ///
    /// # Errors
    ///
    /// * `ApiError::NotAuthenticated` - No session
    /// * `ApiError::InvalidRequest` - Blank reason
    pub async fn create(&mut self, application: &TeacherApplication) -> ApiResult<TeacherRequest> {
        let client = &self.client;
        let created = self
            .status
            .mutate(async {
                let user_id = client.session().user_id().ok_or(ApiError::NotAuthenticated)?;
                let reason = application.reason.trim();
                if reason.is_empty() {
                    return Err(ApiError::InvalidRequest(
                        "Tell us why you want to teach".to_string(),
                    ));
                }
                let body = NewTeacherRequest {
                    user_id,
                    document_url: application.document_url.trim(),
                    reason,
                    status: PENDING,
                };
                let request = ApiRequest::post("/PeticionProfesor")
                    .json(&body)?
                    .auth(AuthMode::Required);
                client.json::<TeacherRequest>(request).await
            })
            .await?;

        self.requests.upsert(created.clone());
        self.status.set_success("Request sent");
        Ok(created)
    }

    /// All requests, for administrators; requires a session
    pub async fn fetch_all(&mut self) -> Vec<TeacherRequestView> {
        let request = ApiRequest::get("/PeticionProfesor").auth(AuthMode::Required);
        match self
            .status
            .read(self.client.json::<Vec<TeacherRequest>>(request))
            .await
        {
            Some(requests) => {
                self.requests.replace_all(requests);
                self.views()
            }
            None => Vec::new(),
        }
    }

    pub fn views(&self) -> Vec<TeacherRequestView> {
        self.requests.iter().map(TeacherRequest::to_view).collect()
    }

    pub async fn reject(&mut self, id: TeacherRequestId) -> ApiResult<()> {
        let request =
            ApiRequest::delete(format!("/PeticionProfesor/rechazar/{id}")).auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        self.requests.remove(id);
        self.status.set_success("Request rejected");
        Ok(())
    }
}
