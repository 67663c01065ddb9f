//! # AcademIQ
//!
//! Client core of the AcademIQ learning platform: the session, the route
//! guard that decides what a visitor may open, and typed stores for every
//! resource the REST backend exposes.
//!
//! ## Architecture
//!
//! Everything goes through one [`ApiClient`], built from a [`ClientConfig`]
//! and a [`Session`] handle:
//!
//! - **Session**: `{user, token}` persisted in a [`auth::SessionStorage`] and
//!   restored on start; a corrupt record restores to logged out
//! - **Route guard**: maps paths to requirements (public, authenticated or a
//!   set of roles) and answers allow, redirect to login or redirect home
//! - **Client**: base URL, per-request timeouts, bearer tokens, retries and
//!   ordered fallback endpoints; a rejected token clears the session
//! - **Stores**: one per resource, each holding its cache plus a shared
//!   `loading`/`error_message` status
//!
//! ## Core Modules
//!
//! - [`auth`]: session, storage and login/registration
//! - [`guard`]: route table and access decisions
//! - [`net`]: HTTP client, requests and errors
//! - [`catalog`], [`media`], [`quiz`], [`admin`]: resource stores
//!
//! ## Example
//!
//! ```
//! use academiq::{Navigation, RouteGuard, Session};
//!
//! let guard = RouteGuard::new(Session::in_memory());
//! assert_eq!(
//!     guard.navigate("/perfil"),
//!     Navigation::Redirect("/login".to_string())
//! );
//! ```

/// User administration, teacher requests, enrollments and statistics.
pub mod admin;

/// Session handling and authentication.
pub mod auth;

/// Courses and subjects.
pub mod catalog;

/// Runtime configuration.
pub mod config;

/// Display helpers shared by the stores.
pub mod display;

/// Route table and navigation guard.
pub mod guard;

/// Videos, uploads, comments, bookmarks, favorites and reports.
pub mod media;

/// HTTP client layer.
pub mod net;

/// Quizzes, questions, answers and results.
pub mod quiz;

/// Building blocks shared by the stores.
pub mod resource;

pub use auth::{AuthManager, Role, Session, User};
pub use config::{ClientConfig, ConfigError, UploadStrategy};
pub use guard::{Navigation, RouteGuard};
pub use net::{
    client::ApiClient,
    errors::{ApiError, ApiResult},
    request::{ApiRequest, AuthMode, RetryPolicy},
};
