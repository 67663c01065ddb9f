//! Bookmark store backed by `/MarcadorVideo`.

use super::models::{Bookmark, BookmarkDraft, BookmarkId, VideoId};
use crate::{
    net::{
        client::ApiClient,
        errors::ApiResult,
        request::{ApiRequest, AuthMode},
    },
    resource::{ResourceCache, StoreStatus},
};

/// Bookmarks of one video, ordered by position
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    client: ApiClient,
    status: StoreStatus,
    bookmarks: ResourceCache<Bookmark>,
}

impl BookmarkStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: StoreStatus::new(),
            bookmarks: ResourceCache::new(),
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.bookmarks.items()
    }

    pub async fn fetch_by_video(&mut self, video: VideoId) -> Vec<Bookmark> {
        let request = ApiRequest::get(format!("/MarcadorVideo/video/{video}"));
        match self.status.read(self.client.json::<Vec<Bookmark>>(request)).await {
            Some(bookmarks) => {
                self.bookmarks.replace_all(bookmarks);
                self.sort();
                self.bookmarks.items().to_vec()
            }
            None => Vec::new(),
        }
    }

    pub async fn create(&mut self, bookmark: &Bookmark) -> ApiResult<Bookmark> {
        let request = ApiRequest::post("/MarcadorVideo")
            .json(bookmark)?
            .auth(AuthMode::Optional);
        let created: Bookmark = self.status.mutate(self.client.json(request)).await?;

        self.bookmarks.upsert(created.clone());
        self.sort();
        Ok(created)
    }

    /// Create several bookmarks in one request, then reload the video's list
    ///
    /// Uses the bulk timeout.
    pub async fn create_bulk(
        &mut self,
        video: VideoId,
        drafts: &[BookmarkDraft],
    ) -> ApiResult<Vec<Bookmark>> {
        if drafts.is_empty() {
            return Ok(self.bookmarks.items().to_vec());
        }

        let request = ApiRequest::post(format!("/MarcadorVideo/video/{video}/bulk"))
            .json(drafts)?
            .timeout(self.client.bulk_timeout())
            .auth(AuthMode::Optional);
        let client = &self.client;
        let bookmarks = self
            .status
            .mutate(async {
                client.send(request).await?;
                let reload = ApiRequest::get(format!("/MarcadorVideo/video/{video}"));
                client.json::<Vec<Bookmark>>(reload).await
            })
            .await?;

        self.bookmarks.replace_all(bookmarks);
        self.sort();
        Ok(self.bookmarks.items().to_vec())
    }

    pub async fn update(&mut self, id: BookmarkId, bookmark: &Bookmark) -> ApiResult<Bookmark> {
        let request = ApiRequest::put(format!("/MarcadorVideo/{id}"))
            .json(bookmark)?
            .auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        let updated = Bookmark {
            id: Some(id),
            ..bookmark.clone()
        };
        self.bookmarks.upsert(updated.clone());
        self.sort();
        Ok(updated)
    }

    pub async fn delete(&mut self, id: BookmarkId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("/MarcadorVideo/{id}")).auth(AuthMode::Optional);
        self.status.mutate(self.client.send(request)).await?;

        self.bookmarks.remove(Some(id));
        Ok(())
    }

    fn sort(&mut self) {
        self.bookmarks.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}
