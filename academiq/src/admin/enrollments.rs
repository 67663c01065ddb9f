//! Course enrollments backed by `/UsuarioCurso`.

use super::models::Enrollment;
use crate::{
    auth::UserId,
    catalog::CourseId,
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};

#[derive(Debug, Clone)]
pub struct EnrollmentStore {
    client: ApiClient,
    status: StoreStatus,
    enrollments: ResourceCache<Enrollment>,
}

impl EnrollmentStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            enrollments: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        self.enrollments.items()
    }

    pub fn is_enrolled(&self, user: UserId, course: CourseId) -> bool {
        self.enrollments.contains((user, course))
    }

    pub async fn fetch_all(&mut self) -> Vec<Enrollment> {
        match self.load(ApiRequest::get("/UsuarioCurso")).await {
            Some(enrollments) => {
                self.enrollments.replace_all(enrollments.clone());
                enrollments
            }
            None => Vec::new(),
        }
    }

    pub async fn fetch_by_user(&mut self, user: UserId) -> Vec<Enrollment> {
        self.load(ApiRequest::get(format!("/UsuarioCurso/usuario/{user}")))
            .await
            .unwrap_or_default()
    }

    pub async fn fetch_by_course(&mut self, course: CourseId) -> Vec<Enrollment> {
        self.load(ApiRequest::get(format!("/UsuarioCurso/curso/{course}")))
            .await
            .unwrap_or_default()
    }

    pub async fn create(&mut self, enrollment: Enrollment) -> ApiResult<()> {
        let request = ApiRequest::post("/UsuarioCurso")
            .json(&enrollment)?
            .auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        self.enrollments.upsert(enrollment);
        Ok(())
    }

    /// Remove an enrollment.
    ///
    /// Backends expose this as `DELETE /UsuarioCurso/{user}/{course}`,
    /// `DELETE /UsuarioCurso?idUsuario=&idCurso=` or
    /// `POST /UsuarioCurso/delete`; they are tried in that order.
    pub async fn delete(&mut self, user: UserId, course: CourseId) -> ApiResult<()> {
        let enrollment = Enrollment::new(user, course);
        let by_query = ApiRequest::delete("/UsuarioCurso")
            .query("idUsuario", user)
            .query("idCurso", course)
            .auth(AuthMode::Optional);
        let by_post = ApiRequest::post("/UsuarioCurso/delete")
            .json(&enrollment)?
            .auth(AuthMode::Optional);
        let request = ApiRequest::delete(format!("/UsuarioCurso/{user}/{course}"))
            .auth(AuthMode::Optional)
            .fallback(by_query)
            .fallback(by_post);
        self.status.mutate(self.client.send(request)).await?;

        self.enrollments.remove((user, course));
        Ok(())
    }

    async fn load(&self, request: ApiRequest) -> Option<Vec<Enrollment>> {
        self.status
            .read(self.client.json::<Vec<Enrollment>>(request))
            .await
    }
}
