//! Authentication data models.

use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User ID type
pub type UserId = i64;

/// Role of a user, carried on the wire as `idRol`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Role {
    Administrator,
    /// Student; also the role of any unknown identifier
    #[default]
    User,
    Teacher,
}

impl Role {
    /// Wire identifier used by the backend
    pub fn id(self) -> i64 {
        match self {
            Role::Administrator => 1,
            Role::User => 2,
            Role::Teacher => 3,
        }
    }

    /// Map a role name returned by `/Auth/login`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "admin" | "administrador" | "administrator" => Role::Administrator,
            "profesor" | "teacher" => Role::Teacher,
            _ => Role::User,
        }
    }
}

impl From<i64> for Role {
    fn from(id: i64) -> Self {
        match id {
            1 => Role::Administrator,
            3 => Role::Teacher,
            _ => Role::User,
        }
    }
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        role.id()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrator"),
            Role::User => write!(f, "user"),
            Role::Teacher => write!(f, "teacher"),
        }
    }
}

/// Logged-in user as persisted under the `user` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "idUsuario")]
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellidos", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "gmail", default)]
    pub email: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "idRol", default)]
    pub role: Role,
}

impl Resource for User {
    type Key = UserId;

    fn key(&self) -> UserId {
        self.id
    }
}

impl User {
    /// Build the session user from a login/registration response
    pub fn from_auth(response: &AuthResponse, email: &str) -> Self {
        Self {
            id: response.user_id,
            first_name: response.name.clone(),
            last_name: None,
            email: email.to_string(),
            phone: None,
            avatar: None,
            role: Role::from_name(&response.role),
        }
    }

    /// First name followed by last name when known
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Login request body
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "gmail")]
    pub email: String,
    #[serde(rename = "contraseña")]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration request body
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellidos", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "gmail")]
    pub email: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "contraseña")]
    pub password: String,
    #[serde(rename = "idRol", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Response of `/Auth/login` and `/Auth/registro`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub token: String,
    #[serde(rename = "rol", default)]
    pub role: String,
}
