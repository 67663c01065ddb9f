//! Session management: who is logged in, with which token.
//!
//! The [`Session`] handle is created once and shared with the route guard
//! and every client. [`AuthManager`] starts it from `/Auth/login` or
//! `/Auth/registro`; the HTTP client clears it when the backend rejects the
//! token. Both user and token are persisted through a [`SessionStorage`]
//! backend under the `user` and `token` keys.
//!
//! ## Example
//!
//! ```no_run
//! use academiq::{ApiClient, ClientConfig};
//! use academiq::auth::{AuthManager, Credentials, FileStorage, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new(FileStorage::new("session.json"));
//!     session.restore();
//!
//!     let client = ApiClient::new(&ClientConfig::development(), session.clone())?;
//!     let auth = AuthManager::new(client);
//!     if !session.is_authenticated() {
//!         let user = auth.login(&Credentials::new("ana@uni.es", "secret")).await?;
//!         println!("Logged in as {}", user.full_name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod session;
pub mod storage;

pub use errors::{StorageError, StorageResult};
pub use manager::AuthManager;
pub use models::{AuthResponse, Credentials, Registration, Role, User, UserId};
pub use session::{Session, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
