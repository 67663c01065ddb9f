use crate::{
    auth::UserId,
    catalog::CourseId,
    display::{self, parse_timestamp},
    resource::Resource,
};
use serde::{Deserialize, Serialize};

/// Teacher request ID type
pub type TeacherRequestId = i64;

/// Avatar shown for requests whose user has none
pub const DEFAULT_REQUEST_AVATAR: &str = "/avatars/default.png";

/// Status given to new teacher requests
pub const PENDING: &str = "Pendiente";

/// Request from a user to become a teacher, from `/PeticionProfesor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRequest {
    #[serde(default)]
    pub id: TeacherRequestId,
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "documentacionUrl", default)]
    pub document_url: String,
    #[serde(rename = "texto", default)]
    pub reason: String,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "fechaCreacion", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "nombreUsuario", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "avatarUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Resource for TeacherRequest {
    type Key = TeacherRequestId;

    fn key(&self) -> TeacherRequestId {
        self.id
    }
}

impl TeacherRequest {
    pub fn to_view(&self) -> TeacherRequestView {
        let date = self
            .created_at
            .as_deref()
            .map(|raw| match parse_timestamp(raw) {
                Some(at) => at.format("%d/%m/%Y").to_string(),
                None => raw.to_string(),
            })
            .unwrap_or_default();

        TeacherRequestView {
            id: self.id,
            user: display::non_blank(self.user_name.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("User {}", self.user_id)),
            avatar: display::non_blank(self.avatar_url.as_deref())
                .unwrap_or(DEFAULT_REQUEST_AVATAR)
                .to_string(),
            document_url: self.document_url.clone(),
            reason: self.reason.clone(),
            date,
            status: self.status.clone(),
            user_id: self.user_id,
        }
    }
}

/// Fields a user fills in to ask for the teacher role
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherApplication {
    pub document_url: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewTeacherRequest<'a> {
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "documentacionUrl")]
    pub document_url: &'a str,
    #[serde(rename = "texto")]
    pub reason: &'a str,
    #[serde(rename = "estado")]
    pub status: &'a str,
}

/// Teacher request ready for an administration table
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherRequestView {
    pub id: TeacherRequestId,
    pub user: String,
    pub avatar: String,
    pub document_url: String,
    pub reason: String,
    /// `dd/mm/yyyy`, or the raw value when it does not parse
    pub date: String,
    pub status: Option<String>,
    pub user_id: UserId,
}

/// Enrollment of a user in a course, from `/UsuarioCurso`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "idCurso")]
    pub course_id: CourseId,
}

impl Enrollment {
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self { user_id, course_id }
    }
}

impl Resource for Enrollment {
    type Key = (UserId, CourseId);

    fn key(&self) -> (UserId, CourseId) {
        (self.user_id, self.course_id)
    }
}

/// Activity counters of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "totalCursos", default)]
    pub courses: u64,
    #[serde(rename = "totalVideos", default)]
    pub videos: u64,
    #[serde(rename = "totalQuizzes", default)]
    pub quizzes: u64,
    /// Absent when the backend does not track it
    #[serde(rename = "fechaUltimaActividad", default)]
    pub last_activity: Option<String>,
}
