//! Video store backed by `/Video`.

use super::models::{Video, VideoId, VideoView};
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
use chrono::Utc;

/// Videos loaded from the backend, in display shape
#[derive(Debug, Clone)]
pub struct VideoStore {
    client: ApiClient,
    status: StoreStatus,
    videos: ResourceCache<VideoView>,
    by_course: Vec<VideoView>,
    current: Option<VideoView>,
}

impl VideoStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            videos: ResourceCache::new(),
            by_course: Vec::new(),
            current: None,
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn videos(&self) -> &[VideoView] {
        self.videos.items()
    }

    /// Videos of the course loaded last
    pub fn course_videos(&self) -> &[VideoView] {
        &self.by_course
    }

    pub fn current(&self) -> Option<&VideoView> {
        self.current.as_ref()
    }

    pub async fn fetch_all(&mut self) -> Vec<VideoView> {
        let views = self.load(ApiRequest::get("/Video")).await;
        if let Some(views) = &views {
            self.videos.replace_all(views.clone());
        }
        views.unwrap_or_default()
    }

    pub async fn fetch_by_course(&mut self, course: CourseId) -> Vec<VideoView> {
        match self.load(ApiRequest::get(format!("/Video/curso/{course}"))).await {
            Some(views) => {
                self.by_course = views.clone();
                views
            }
            None => Vec::new(),
        }
    }

    /// Videos uploaded by a teacher
    pub async fn fetch_by_owner(&mut self, owner: UserId) -> Vec<VideoView> {
        let request =
            ApiRequest::get(format!("/Video/usuario/{owner}")).auth(AuthMode::Optional);
        self.load(request).await.unwrap_or_default()
    }

    pub async fn fetch_by_id(&mut self, id: VideoId) -> Option<VideoView> {
        let request = ApiRequest::get(format!("/Video/{id}"));
        let video = self.status.read(self.client.json::<Video>(request)).await;
        self.current = video.map(|v| v.to_view(Utc::now()));
        self.current.clone()
    }

    /// Remove a video; used by administrators moderating reports
    pub async fn delete(&mut self, id: VideoId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/Video/{id}")).auth(AuthMode::Required);
        self.status.mutate(self.client.send(request)).await?;

        self.videos.remove(id);
        self.by_course.retain(|v| v.id != id);
        if self.current.as_ref().is_some_and(|v| v.id == id) {
            self.current = None;
        }
        self.status.set_success("Video deleted");
        Ok(())
    }

    async fn load(&self, request: ApiRequest) -> Option<Vec<VideoView>> {
        let videos = self
            .status
            .read(self.client.json::<Vec<Video>>(request))
            .await?;
        let now = Utc::now();
        Some(videos.iter().map(|v| v.to_view(now)).collect())
    }
}
