//! Video, comment, bookmark and report records.

use crate::{
    auth::UserId,
    catalog::{CourseId, SubjectId},
    display::{
        DEFAULT_AUTHOR, DEFAULT_SUBJECT, DEFAULT_USER, avatar_url, default_thumbnail, full_name,
        non_blank, relative_time_from,
    },
    resource::Resource,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Video ID type
pub type VideoId = i64;

/// Nested reference the backend sends either as an object or a bare name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamedRef {
    Object {
        #[serde(rename = "nombre", default)]
        name: Option<String>,
        #[serde(rename = "apellidos", default)]
        last_name: Option<String>,
    },
    Name(String),
}

impl NamedRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            NamedRef::Object { name, .. } => non_blank(name.as_deref()),
            NamedRef::Name(name) => non_blank(Some(name)),
        }
    }

    pub fn full_name(&self) -> Option<String> {
        match self {
            NamedRef::Object { name, last_name } => full_name(name.as_deref(), last_name.as_deref()),
            NamedRef::Name(name) => non_blank(Some(name)).map(str::to_string),
        }
    }
}

/// Video as returned by `/Video`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "idVideo")]
    pub id: VideoId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "miniatura", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "fechaSubida", default)]
    pub uploaded_at: Option<String>,
    #[serde(rename = "idAsignatura", default)]
    pub subject_id: Option<SubjectId>,
    #[serde(rename = "asignatura", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<NamedRef>,
    #[serde(rename = "idUsuario", default)]
    pub author_id: Option<UserId>,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
    #[serde(rename = "idCurso", default)]
    pub course_id: Option<CourseId>,
    #[serde(rename = "duracion", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(rename = "vistas", default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

impl Resource for Video {
    type Key = VideoId;

    fn key(&self) -> VideoId {
        self.id
    }
}

impl Video {
    /// Display shape with defaults filled in, ages relative to `now`
    pub fn to_view(&self, now: DateTime<Utc>) -> VideoView {
        VideoView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            url: self.url.clone(),
            thumbnail: non_blank(self.thumbnail.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| default_thumbnail(self.id)),
            subject_id: self.subject_id,
            subject: self
                .subject
                .as_ref()
                .and_then(NamedRef::name)
                .unwrap_or(DEFAULT_SUBJECT)
                .to_string(),
            author_id: self.author_id,
            author: self
                .author
                .as_ref()
                .and_then(NamedRef::name)
                .unwrap_or(DEFAULT_AUTHOR)
                .to_string(),
            course_id: self.course_id,
            duration: self.duration.clone(),
            views: self.views,
            uploaded_at: self.uploaded_at.clone(),
            uploaded: self
                .uploaded_at
                .as_deref()
                .map(|raw| relative_time_from(raw, now))
                .unwrap_or_default(),
        }
    }
}

/// Video ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct VideoView {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    pub subject_id: Option<SubjectId>,
    pub subject: String,
    pub author_id: Option<UserId>,
    pub author: String,
    pub course_id: Option<CourseId>,
    pub duration: Option<String>,
    /// `None` when the backend does not report views
    pub views: Option<u64>,
    pub uploaded_at: Option<String>,
    /// Relative upload time such as `3 days ago`
    pub uploaded: String,
}

impl Resource for VideoView {
    type Key = VideoId;

    fn key(&self) -> VideoId {
        self.id
    }
}

/// Comment ID type
pub type CommentId = i64;

/// Comment as returned by `/ComentarioVideo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "idComentario")]
    pub id: CommentId,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "fecha", default)]
    pub created_at: String,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "idVideo")]
    pub video_id: VideoId,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
}

impl Comment {
    pub fn to_view(&self, now: DateTime<Utc>) -> CommentView {
        CommentView {
            id: self.id,
            author: self
                .user
                .as_ref()
                .and_then(NamedRef::full_name)
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            avatar: avatar_url(self.user_id),
            content: self.text.clone(),
            time: relative_time_from(&self.created_at, now),
            user_id: self.user_id,
            created_at: self.created_at.clone(),
        }
    }
}

/// Comment ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub id: CommentId,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub time: String,
    pub user_id: UserId,
    pub created_at: String,
}

impl Resource for CommentView {
    type Key = CommentId;

    fn key(&self) -> CommentId {
        self.id
    }
}

/// Comment creation body
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewComment {
    #[serde(rename = "idComentario")]
    pub id: CommentId,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "fecha")]
    pub created_at: String,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "idVideo")]
    pub video_id: VideoId,
}

/// Bookmark ID type
pub type BookmarkId = i64;

/// Marker at a moment of a video, from `/MarcadorVideo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(rename = "idMarcador", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookmarkId>,
    #[serde(rename = "idVideo")]
    pub video_id: VideoId,
    /// Position in the video
    #[serde(rename = "minutoImportante", default)]
    pub time: f64,
    #[serde(rename = "titulo", default)]
    pub title: String,
}

impl Resource for Bookmark {
    type Key = Option<BookmarkId>;

    fn key(&self) -> Option<BookmarkId> {
        self.id
    }
}

/// Bookmark without a video, as supplied with an upload or a bulk create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    #[serde(rename = "minutoImportante")]
    pub time: f64,
    #[serde(rename = "titulo")]
    pub title: String,
}

impl BookmarkDraft {
    pub fn new(time: f64, title: impl Into<String>) -> Self {
        Self {
            time,
            title: title.into(),
        }
    }

    pub fn for_video(&self, video_id: VideoId) -> Bookmark {
        Bookmark {
            id: None,
            video_id,
            time: self.time,
            title: self.title.clone(),
        }
    }
}

/// Report ID type
pub type ReportId = i64;

/// Report of an inappropriate video, from `/ReporteVideo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "idReporte", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReportId>,
    #[serde(rename = "idVideo")]
    pub video_id: VideoId,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fechaReporte", default, skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<String>,
}
