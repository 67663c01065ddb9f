//! Course store backed by `/Curso`.

use super::models::{Course, CourseId, NewCourse};
use crate::{
    auth::UserId,
    media::file::UploadFile,
    net::{
        client::{ApiClient, decode},
        errors::{ApiError, ApiResult},
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};
use reqwest::multipart::Form;

/// Courses loaded from the backend
#[derive(Debug, Clone)]
pub struct CourseStore {
    client: ApiClient,
    status: StoreStatus,
    courses: ResourceCache<Course>,
    current: Option<Course>,
}

impl CourseStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            courses: ResourceCache::new(),
            current: None,
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn courses(&self) -> &[Course] {
        self.courses.items()
    }

    /// Course loaded by the last [`fetch_by_id`](Self::fetch_by_id)
    pub fn current(&self) -> Option<&Course> {
        self.current.as_ref()
    }

    /// Load every course; empty on failure
    pub async fn fetch_all(&mut self) -> Vec<Course> {
        let request = ApiRequest::get("/Curso");
        match self.status.read(self.client.json::<Vec<Course>>(request)).await {
            Some(courses) => {
                self.courses.replace_all(courses.clone());
                courses
            }
            None => Vec::new(),
        }
    }

    pub async fn fetch_by_id(&mut self, id: CourseId) -> Option<Course> {
        let request = ApiRequest::get(format!("/Curso/{id}"));
        self.current = self.status.read(self.client.json::<Course>(request)).await;
        self.current.clone()
    }

    /// Courses owned by a teacher; empty on failure
    pub async fn fetch_by_owner(&mut self, owner: UserId) -> Vec<Course> {
        let request =
            ApiRequest::get(format!("/Curso/usuario/{owner}")).auth(AuthMode::Optional);
        self.status
            .read(self.client.json::<Vec<Course>>(request))
            .await
            .unwrap_or_default()
    }

    /// Create a course owned by the logged-in user
    ///
    /// # Arguments
    ///
    /// * `course` - Name and description
    /// * `image` - Optional cover image
    ///
    /// # Errors
    ///
    /// * `ApiError::NotAuthenticated` - No session
    /// * Any backend error; the cache is left unchanged
    pub async fn create(
        &mut self,
        course: &NewCourse,
        image: Option<&UploadFile>,
    ) -> ApiResult<Course> {
        let client = self.client.clone();
        let created = self
            .status
            .mutate(async {
                let owner = client.session().user_id().ok_or(ApiError::NotAuthenticated)?;
                let mut form = Form::new()
                    .text("Nombre", course.name.clone())
                    .text("Descripcion", course.description.clone().unwrap_or_default())
                    .text("IdUsuario", owner.to_string());
                if let Some(image) = image {
                    form = form.part("Imagen", image.part()?);
                }
                let timeout = client.request_timeout();
                let body = client
                    .send_multipart("/Curso/crear", form, AuthMode::Required, timeout)
                    .await?;
                decode::<Course>("/Curso/crear", &body)
            })
            .await?;

        self.courses.upsert(created.clone());
        self.status.set_success("Course created");
        Ok(created)
    }

    pub async fn update(&mut self, course: &Course) -> ApiResult<Course> {
        let request = ApiRequest::put(format!("/Curso/{}", course.id))
            .json(course)?
            .auth(AuthMode::Optional);
        let updated: Course = self.status.mutate(self.client.json(request)).await?;

        self.courses.upsert(updated.clone());
        if self.current.as_ref().is_some_and(|c| c.id == updated.id) {
            self.current = Some(updated.clone());
        }
        self.status.set_success("Course updated");
        Ok(updated)
    }

    pub async fn delete(&mut self, id: CourseId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/Curso/{id}")).auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        self.courses.remove(id);
        if self.current.as_ref().is_some_and(|c| c.id == id) {
            self.current = None;
        }
        self.status.set_success("Course deleted");
        Ok(())
    }
}
