//! Course and subject records.

use crate::{auth::UserId, resource::Resource};
use serde::{Deserialize, Serialize};

/// Course ID type
pub type CourseId = i64;

/// Subject ID type
pub type SubjectId = i64;

/// Course as returned by `/Curso`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "idCurso")]
    pub id: CourseId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
    #[serde(rename = "fechaCreacion", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "idUsuario", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
}

impl Resource for Course {
    type Key = CourseId;

    fn key(&self) -> CourseId {
        self.id
    }
}

/// Fields of a course to create; the owner is the logged-in user
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
}

/// Subject as returned by `/Asignatura`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "idAsignatura")]
    pub id: SubjectId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "idCurso")]
    pub course_id: CourseId,
}

impl Resource for Subject {
    type Key = SubjectId;

    fn key(&self) -> SubjectId {
        self.id
    }
}

/// Subject creation body
#[derive(Debug, Clone, Serialize)]
pub struct NewSubject {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "idCurso")]
    pub course_id: CourseId,
}
