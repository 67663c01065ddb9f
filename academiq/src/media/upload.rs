//! Video upload, either as one multipart request or through presigned storage URLs.

use super::{
    bookmarks::BookmarkStore,
    file::UploadFile,
    models::{BookmarkDraft, Video},
    progress::{COMPLETE, ProgressReporter},
};
use crate::{
    auth::UserId,
    catalog::{CourseId, SubjectId},
    config::UploadStrategy,
    net::{
        client::{ApiClient, decode, strip_query},
        errors::{ApiError, ApiResult},
        request::{ApiRequest, AuthMode},
    },
    resource::StoreStatus,
};
use log::{info, warn};
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

/// Title sent when the caller left it blank
pub const UNTITLED: &str = "Untitled video";

/// Course and subject used when neither is given
const DEFAULT_PLACEMENT: i64 = 1;

/// Metadata of an uploaded video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub course_id: Option<CourseId>,
    pub subject_id: Option<SubjectId>,
}

impl VideoDetails {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn title_or_default(&self) -> &str {
        match self.title.trim() {
            "" => UNTITLED,
            title => title,
        }
    }

    /// Course and subject fields; both default to 1 only when neither is set
    fn placement(&self) -> (Option<CourseId>, Option<SubjectId>) {
        match (self.course_id, self.subject_id) {
            (None, None) => (Some(DEFAULT_PLACEMENT), Some(DEFAULT_PLACEMENT)),
            placement => placement,
        }
    }
}

/// Everything needed to publish one video
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub video: UploadFile,
    pub thumbnail: Option<UploadFile>,
    pub details: VideoDetails,
    /// Bookmarks created once the video exists
    pub bookmarks: Vec<BookmarkDraft>,
}

impl UploadRequest {
    pub fn new(video: UploadFile, details: VideoDetails) -> Self {
        Self {
            video,
            thumbnail: None,
            details,
            bookmarks: Vec::new(),
        }
    }

    pub fn thumbnail(mut self, thumbnail: UploadFile) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    pub fn bookmarks(mut self, bookmarks: Vec<BookmarkDraft>) -> Self {
        self.bookmarks = bookmarks;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignRequest<'a> {
    file_name: &'a str,
    content_type: &'a str,
    file_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresignResponse {
    presigned_url: String,
    #[serde(default)]
    file_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoRecord<'a> {
    title: &'a str,
    description: &'a str,
    video_url: &'a str,
    thumbnail_url: Option<&'a str>,
    timestamps: &'a [BookmarkDraft],
}

/// Publishes videos and their bookmarks
#[derive(Debug, Clone)]
pub struct VideoUploader {
    client: ApiClient,
    status: StoreStatus,
    strategy: UploadStrategy,
    bookmarks: BookmarkStore,
}

impl VideoUploader {
    pub fn new(client: ApiClient, strategy: UploadStrategy) -> Self {
        Self {
            bookmarks: BookmarkStore::new(client.clone()),
            client,
            status: StoreStatus::new(),
            strategy,
        }
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn strategy(&self) -> UploadStrategy {
        self.strategy
    }

    /// Upload a video and create its bookmarks
    ///
    /// # Arguments
    ///
    /// * `request` - Files, metadata and bookmarks
    /// * `progress` - Receives non-decreasing percentages; 100 only on success
    ///
    /// # Returns
    ///
    /// * `ApiResult<Video>` - The video record created by the backend
    ///
    /// # Errors
    ///
    /// * `ApiError::NotAuthenticated` - No session user
    /// * `ApiError::InvalidRequest` - Empty video file
    /// * Any backend error from the upload itself. Bookmark failures are
    ///   logged and do not fail the upload.
    pub async fn upload(
        &mut self,
        request: UploadRequest,
        progress: ProgressReporter,
    ) -> ApiResult<Video> {
        let strategy = self.strategy;
        let video = self
            .status
            .mutate(async {
                if request.video.is_empty() {
                    return Err(ApiError::InvalidRequest("Video file is empty".to_string()));
                }
                let user = self
                    .client
                    .session()
                    .user_id()
                    .ok_or(ApiError::NotAuthenticated)?;
                progress.report(0);
                match strategy {
                    UploadStrategy::Multipart => {
                        self.upload_multipart(&request, user, &progress).await
                    }
                    UploadStrategy::Presigned => self.upload_presigned(&request, &progress).await,
                }
            })
            .await?;

        info!("Uploaded video {} ({})", video.id, video.title);

        if strategy == UploadStrategy::Multipart && !request.bookmarks.is_empty() {
            if let Err(err) = self.bookmarks.create_bulk(video.id, &request.bookmarks).await {
                warn!("Video {} uploaded but its bookmarks failed: {err}", video.id);
            }
        }

        progress.report(COMPLETE);
        self.status.set_success("Video uploaded");
        Ok(video)
    }

    async fn upload_multipart(
        &self,
        request: &UploadRequest,
        user: UserId,
        progress: &ProgressReporter,
    ) -> ApiResult<Video> {
        let total = request.video.len() + request.thumbnail.as_ref().map_or(0, UploadFile::len);
        let counter = progress.phase(0, COMPLETE - 1).counter(total);

        let video_counter = counter.clone();
        let video_part = request
            .video
            .part_with_body(request.video.streaming_body(move |n| video_counter.add(n)))?;
        let mut form = Form::new().part("Video", video_part);

        if let Some(thumbnail) = &request.thumbnail {
            let thumbnail_counter = counter.clone();
            let part = thumbnail
                .part_with_body(thumbnail.streaming_body(move |n| thumbnail_counter.add(n)))?;
            form = form.part("Miniatura", part);
        }

        let details = &request.details;
        form = form
            .text("Titulo", details.title_or_default().to_string())
            .text("Descripcion", details.description.clone());
        let (course, subject) = details.placement();
        if let Some(course) = course {
            form = form.text("IdCurso", course.to_string());
        }
        if let Some(subject) = subject {
            form = form.text("IdAsignatura", subject.to_string());
        }
        form = form.text("IdUsuario", user.to_string());

        let path = "/Video/registrar";
        let body = self
            .client
            .send_multipart(path, form, AuthMode::Optional, self.client.upload_timeout())
            .await?;
        decode(path, &body)
    }

    async fn upload_presigned(
        &self,
        request: &UploadRequest,
        progress: &ProgressReporter,
    ) -> ApiResult<Video> {
        progress.report(5);
        let video_url = self
            .put_to_storage(&request.video, "video", progress, 5, 70)
            .await?;

        let thumbnail_url = match &request.thumbnail {
            Some(thumbnail) => {
                progress.report(75);
                Some(
                    self.put_to_storage(thumbnail, "thumbnail", progress, 75, 15)
                        .await?,
                )
            }
            None => None,
        };

        progress.report(90);
        let details = &request.details;
        let record = VideoRecord {
            title: details.title_or_default(),
            description: &details.description,
            video_url: &video_url,
            thumbnail_url: thumbnail_url.as_deref(),
            timestamps: &request.bookmarks,
        };
        let create = ApiRequest::post("/videos")
            .json(&record)?
            .auth(AuthMode::Optional);
        self.client.json(create).await
    }

    /// Obtain a presigned URL for `file`, PUT it there and return its public URL
    async fn put_to_storage(
        &self,
        file: &UploadFile,
        file_type: &str,
        progress: &ProgressReporter,
        start: u8,
        span: u8,
    ) -> ApiResult<String> {
        let presign = ApiRequest::post("/s3/get-presigned-url")
            .json(&PresignRequest {
                file_name: &file.file_name,
                content_type: &file.content_type,
                file_type,
            })?
            .auth(AuthMode::Optional);
        let target: PresignResponse = self.client.json(presign).await?;

        let counter = progress.phase(start, span).counter(file.len());
        let body = file.streaming_body(move |n| counter.add(n));
        self.client
            .put_raw(
                &target.presigned_url,
                body,
                &file.content_type,
                file.len(),
                self.client.upload_timeout(),
            )
            .await?;

        let public_url = strip_query(&target.presigned_url).to_string();
        if let Some(key) = &target.file_key {
            info!("Stored {file_type} {} as {key}", file.file_name);
        }
        Ok(public_url)
    }
}
