//! Comment store backed by `/ComentarioVideo`.

use super::models::{Comment, CommentView, NewComment, VideoId};
use crate::{
    net::{
        client::ApiClient,
        errors::{ApiError, ApiResult},
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};
use chrono::{SecondsFormat, Utc};
use log::debug;

/// Comments of one video at a time
#[derive(Debug, Clone)]
pub struct CommentStore {
    client: ApiClient,
    status: StoreStatus,
    video: Option<VideoId>,
    comments: ResourceCache<CommentView>,
}

impl CommentStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            video: None,
            comments: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn comments(&self) -> &[CommentView] {
        self.comments.items()
    }

    /// Load the comments of `video`.
    ///
    /// A video without comments answers 404, which yields an empty list
    /// without an error message.
    pub async fn fetch_by_video(&mut self, video: VideoId) -> Vec<CommentView> {
        let request = ApiRequest::get(format!("/ComentarioVideo/video/{video}"));
        let client = &self.client;
        let result = self
            .status
            .read(async {
                match client.json::<Vec<Comment>>(request).await {
                    Err(err) if err.is_not_found() => {
                        debug!("Video {video} has no comments");
                        Ok(Vec::new())
                    }
                    other => other,
                }
            })
            .await;

        let Some(comments) = result else {
            return Vec::new();
        };
        self.video = Some(video);
        let now = Utc::now();
        let views: Vec<CommentView> = comments.iter().map(|c| c.to_view(now)).collect();
        self.comments.replace_all(views.clone());
        views
    }

    /// Post a comment as the logged-in user
    ///
    /// # Errors
    ///
    /// * `ApiError::NotAuthenticated` - No session
    /// * `ApiError::InvalidRequest` - Empty text
    pub async fn create(&mut self, video: VideoId, text: &str) -> ApiResult<CommentView> {
        let client = &self.client;
        let created = self
            .status
            .mutate(async {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ApiError::InvalidRequest("Comment cannot be empty".to_string()));
                }
                let user_id = client.session().user_id().ok_or(ApiError::NotAuthenticated)?;
                let body = NewComment {
                    id: 0,
                    text: text.to_string(),
                    created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    user_id,
                    video_id: video,
                };
                let request = ApiRequest::post("/ComentarioVideo")
                    .json(&body)?
                    .auth(AuthMode::Optional);
                client.json::<Comment>(request).await
            })
            .await?;

        let view = created.to_view(Utc::now());
        if self.video == Some(video) {
            self.comments.upsert(view.clone());
        }
        Ok(view)
    }
}
