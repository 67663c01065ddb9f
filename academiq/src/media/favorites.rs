//! Favorite videos of the logged-in user, backed by `/favorito`.

use super::models::{Video, VideoId, VideoView};
use crate::{
    net::{
        client::ApiClient,
        errors::{ApiError, ApiResult},
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};
use chrono::Utc;
use log::warn;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    #[serde(default)]
    liked: bool,
}

/// Liked videos of the session user
#[derive(Debug, Clone)]
pub struct FavoriteStore {
    client: ApiClient,
    status: StoreStatus,
    favorites: ResourceCache<VideoView>,
}

impl FavoriteStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            favorites: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn favorites(&self) -> &[VideoView] {
        self.favorites.items()
    }

    pub fn is_favorite(&self, video: VideoId) -> bool {
        self.favorites.contains(video)
    }

    /// Load the session user's favorites; empty when logged out or on failure
    pub async fn fetch(&mut self) -> Vec<VideoView> {
        let Some(user) = self.client.session().user_id() else {
            self.favorites.clear();
            return Vec::new();
        };

        let request =
            ApiRequest::get(format!("/favorito/usuario/{user}")).auth(AuthMode::Required);
        let Some(videos) = self.status.read(self.client.json::<Vec<Video>>(request)).await else {
            return Vec::new();
        };

        let now = Utc::now();
        let views: Vec<VideoView> = videos.iter().map(|v| v.to_view(now)).collect();
        self.favorites.replace_all(views.clone());
        views
    }

    /// Like or unlike a video
    ///
    /// # Returns
    ///
    /// * `ApiResult<bool>` - Whether the video is now a favorite
    ///
    /// # Errors
    ///
    /// * `ApiError::NotAuthenticated` - No session
    /// * Any backend error; the list is reloaded from the backend
    pub async fn toggle(&mut self, video: VideoId) -> ApiResult<bool> {
        if self.client.session().user_id().is_none() {
            let err = ApiError::NotAuthenticated;
            self.status.record(&err);
            return Err(err);
        }

        let request = ApiRequest::post(format!("/favorito/toggle/{video}"))
            .json(&serde_json::json!({}))?
            .auth(AuthMode::Required);
        let result = self
            .status
            .mutate(self.client.json::<ToggleResponse>(request))
            .await;
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.reload_quietly().await;
                return Err(err);
            }
        };

        if !response.liked {
            self.favorites.remove(video);
            return Ok(false);
        }

        if !self.is_favorite(video) {
            let request = ApiRequest::get(format!("/Video/{video}")).auth(AuthMode::Optional);
            match self.client.json::<Video>(request).await {
                Ok(liked) => self.favorites.upsert(liked.to_view(Utc::now())),
                Err(err) => {
                    warn!("Could not load liked video {video}: {err}");
                    self.reload_quietly().await;
                }
            }
        }
        Ok(true)
    }

    async fn reload_quietly(&mut self) {
        let error = self.status.error_message();
        self.fetch().await;
        if let Some(message) = error {
            self.status.set_error(message);
        }
    }
}
