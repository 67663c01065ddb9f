//! Shared session handle.

use super::{
    errors::StorageError,
    models::{Role, User, UserId},
    storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY},
};
use log::{info, warn};
use std::sync::{Arc, RwLock};

/// Point-in-time copy of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
}

struct SessionInner {
    state: RwLock<SessionState>,
    storage: Box<dyn SessionStorage>,
}

/// Current user and bearer token, shared by the guard and every client.
///
/// Clones refer to the same session. The token is present exactly when the
/// user is, and every change is written through to the storage backend.
/// Storage failures are logged; the in-memory session stays authoritative.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("Session")
            .field("user", &state.user.as_ref().map(|u| u.id))
            .field("authenticated", &state.token.is_some())
            .finish()
    }
}

impl Session {
    /// Create a logged-out session persisted to `storage`
    ///
    /// Call [`restore`](Self::restore) to load a previous login.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::default()),
                storage: Box::new(storage),
            }),
        }
    }

    /// Create a session that is never persisted
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Load the persisted login.
    ///
    /// When either key is missing, unreadable or the user does not parse,
    /// both keys are cleared and the session stays logged out.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether a session was restored
    pub fn restore(&self) -> bool {
        let storage = &self.inner.storage;
        let token = storage.get(TOKEN_KEY);
        let user = storage.get(USER_KEY);

        let restored = match (token, user) {
            (Ok(Some(token)), Ok(Some(user_json))) if !token.is_empty() => {
                match serde_json::from_str::<User>(&user_json) {
                    Ok(user) => Some((user, token)),
                    Err(e) => {
                        warn!("Discarding persisted user: {e}");
                        None
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Could not read persisted session: {e}");
                None
            }
            _ => None,
        };

        match restored {
            Some((user, token)) => {
                info!("Restored session for user {}", user.id);
                self.set_state(SessionState {
                    user: Some(user),
                    token: Some(token),
                });
                true
            }
            None => {
                self.clear();
                false
            }
        }
    }

    /// Log `user` in with `token` and persist both
    pub fn start(&self, user: User, token: String) {
        info!("Session started for user {}", user.id);
        self.persist_user(&user);
        if let Err(e) = self.inner.storage.set(TOKEN_KEY, &token) {
            warn!("Could not persist token: {e}");
        }
        self.set_state(SessionState {
            user: Some(user),
            token: Some(token),
        });
    }

    /// Replace the user record, keeping the token.
    ///
    /// Ignored when logged out, since a user without a token would break
    /// the session invariant.
    pub fn update_user(&self, user: User) {
        let mut state = self.write();
        if state.token.is_none() {
            warn!("Ignoring user update without an active session");
            return;
        }
        self.persist_user(&user);
        state.user = Some(user);
    }

    /// Clear the session in memory and storage
    pub fn logout(&self) {
        if self.is_authenticated() {
            info!("Session closed");
        }
        self.clear();
    }

    /// Clear the session after the backend rejected the token
    pub fn invalidate(&self) {
        warn!("Bearer token rejected, session cleared");
        self.clear();
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.read().user.as_ref().map(|u| u.id)
    }

    pub fn role(&self) -> Option<Role> {
        self.read().user.as_ref().map(|u| u.role)
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    /// Whether the current user holds one of `roles`
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|role| roles.contains(&role))
    }

    fn clear(&self) {
        *self.write() = SessionState::default();
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.inner.storage.remove(key) {
                warn!("Could not remove persisted {key}: {e}");
            }
        }
    }

    fn persist_user(&self, user: &User) {
        let result = serde_json::to_string(user)
            .map_err(StorageError::from)
            .and_then(|json| self.inner.storage.set(USER_KEY, &json));
        if let Err(e) = result {
            warn!("Could not persist user: {e}");
        }
    }

    fn set_state(&self, state: SessionState) {
        *self.write() = state;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::FileStorage;

    fn user(id: UserId, role: Role) -> User {
        User {
            id,
            first_name: "Test".into(),
            last_name: None,
            email: format!("user{id}@uni.es"),
            phone: None,
            avatar: None,
            role,
        }
    }

    #[test]
    fn test_start_and_logout() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.start(user(1, Role::Teacher), "tok".into());
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert!(session.has_role(&[Role::Teacher, Role::Administrator]));
        assert!(!session.has_role(&[Role::Administrator]));

        session.logout();
        assert_eq!(session.snapshot(), SessionState::default());
        assert!(!session.has_role(&[Role::User]));
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let other = session.clone();
        session.start(user(2, Role::User), "tok".into());
        assert_eq!(other.user_id(), Some(2));
        other.invalidate();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = Session::new(FileStorage::new(&path));
        session.start(user(5, Role::Administrator), "tok-5".into());

        let restored = Session::new(FileStorage::new(&path));
        assert!(restored.restore());
        assert_eq!(restored.user_id(), Some(5));
        assert_eq!(restored.role(), Some(Role::Administrator));
        assert_eq!(restored.token().as_deref(), Some("tok-5"));
    }

    #[test]
    fn test_restore_corrupt_user_clears_storage() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, "{broken").unwrap();

        let session = Session::new(storage);
        assert!(!session.restore());
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.inner.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(session.inner.storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_token_without_user() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();

        let session = Session::new(storage);
        assert!(!session.restore());
        assert_eq!(session.inner.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_user_keeps_token() {
        let session = Session::in_memory();
        session.update_user(user(1, Role::User));
        assert!(!session.is_authenticated());

        session.start(user(1, Role::User), "tok".into());
        let mut promoted = user(1, Role::Teacher);
        promoted.first_name = "Promoted".into();
        session.update_user(promoted);

        assert_eq!(session.role(), Some(Role::Teacher));
        assert_eq!(session.token().as_deref(), Some("tok"));
    }
}
