//! Navigation guard.
//!
//! Before showing a page the caller asks the [`RouteGuard`] where the user may
//! go. Decisions are synchronous and read only the shared session.

pub mod access;
pub mod routes;

pub use access::{Access, Requirement, can_access};
pub use routes::{ResolvedRoute, Route, RouteTable};

use crate::auth::Session;
use log::debug;

/// Redirect chains longer than this are treated as unknown routes
const MAX_REDIRECTS: usize = 8;

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show `path`, possibly after following route redirects
    Allow {
        path: String,
        params: Vec<(String, String)>,
    },
    /// Go to this path instead
    Redirect(String),
    NotFound,
}

/// Decides navigations against a route table and the session
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RouteTable,
    session: Session,
    login_path: String,
    fallback_path: String,
}

impl RouteGuard {
    /// Guard over the AcademIQ routes. Users lacking a role go to `/cursos`.
    pub fn new(session: Session) -> Self {
        Self::with_table(RouteTable::academiq(), session)
    }

    pub fn with_table(table: RouteTable, session: Session) -> Self {
        Self {
            table,
            session,
            login_path: "/login".to_string(),
            fallback_path: "/cursos".to_string(),
        }
    }

    /// Where users without a required role are sent
    pub fn fallback_to(mut self, path: &str) -> Self {
        self.fallback_path = path.to_string();
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide a navigation to `path`
    pub fn navigate(&self, path: &str) -> Navigation {
        let mut target = path.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let Some(route) = self.table.resolve(&target) else {
                debug!("No route for {target}");
                return Navigation::NotFound;
            };

            if let Some(next) = route.redirect {
                debug!("{target} redirects to {next}");
                target = next;
                continue;
            }

            return match can_access(&self.session, &route.requirement) {
                Access::Granted => Navigation::Allow {
                    path: target,
                    params: route.params,
                },
                Access::NeedsLogin => {
                    debug!("{target} needs a session");
                    Navigation::Redirect(self.login_path.clone())
                }
                Access::Forbidden => {
                    debug!("{target} needs another role");
                    Navigation::Redirect(self.fallback_path.clone())
                }
            };
        }

        Navigation::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, User};

    fn login(session: &Session, role: Role) {
        let user = User {
            id: 3,
            first_name: "Test".into(),
            last_name: None,
            email: "t@uni.es".into(),
            phone: None,
            avatar: None,
            role,
        };
        session.start(user, "tok".into());
    }

    fn allowed(path: &str) -> Navigation {
        Navigation::Allow {
            path: path.to_string(),
            params: Vec::new(),
        }
    }

    #[test]
    fn test_public_routes_without_session() {
        let guard = RouteGuard::new(Session::in_memory());
        assert_eq!(guard.navigate("/cursos"), allowed("/cursos"));
        assert_eq!(guard.navigate("/login"), allowed("/login"));
    }

    #[test]
    fn test_requires_auth_redirects_to_login() {
        let guard = RouteGuard::new(Session::in_memory());
        for path in ["/perfil", "/historial", "/curso/1", "/subir-video", "/admin/cursos"] {
            assert_eq!(guard.navigate(path), Navigation::Redirect("/login".into()));
        }
    }

    #[test]
    fn test_role_mismatch_redirects_to_courses() {
        let session = Session::in_memory();
        login(&session, Role::User);
        let guard = RouteGuard::new(session);

        assert_eq!(guard.navigate("/subir-video"), Navigation::Redirect("/cursos".into()));
        assert_eq!(guard.navigate("/admin/usuarios"), Navigation::Redirect("/cursos".into()));
        assert_eq!(guard.navigate("/perfil"), allowed("/perfil"));
    }

    #[test]
    fn test_teacher_can_upload_but_not_administer() {
        let session = Session::in_memory();
        login(&session, Role::Teacher);
        let guard = RouteGuard::new(session);

        assert_eq!(guard.navigate("/subir-video"), allowed("/subir-video"));
        assert_eq!(guard.navigate("/admin"), Navigation::Redirect("/cursos".into()));
    }

    #[test]
    fn test_admin_follows_route_redirect() {
        let session = Session::in_memory();
        login(&session, Role::Administrator);
        let guard = RouteGuard::new(session);

        assert_eq!(guard.navigate("/admin"), allowed("/admin/usuarios"));
    }

    #[test]
    fn test_params_and_not_found() {
        let session = Session::in_memory();
        login(&session, Role::User);
        let guard = RouteGuard::new(session);

        assert_eq!(
            guard.navigate("/curso/42"),
            Navigation::Allow {
                path: "/curso/42".into(),
                params: vec![("id".into(), "42".into())],
            }
        );
        assert_eq!(guard.navigate("/no-such-page"), Navigation::NotFound);
    }

    #[test]
    fn test_redirect_loop_is_not_found() {
        let table = RouteTable::new(vec![
            Route::new("/a").redirect("/b"),
            Route::new("/b").redirect("/a"),
        ]);
        let guard = RouteGuard::with_table(table, Session::in_memory());
        assert_eq!(guard.navigate("/a"), Navigation::NotFound);
    }

    #[test]
    fn test_session_changes_are_seen() {
        let session = Session::in_memory();
        let guard = RouteGuard::new(session.clone());
        assert_eq!(guard.navigate("/perfil"), Navigation::Redirect("/login".into()));
        login(&session, Role::User);
        assert_eq!(guard.navigate("/perfil"), allowed("/perfil"));
        session.logout();
        assert_eq!(guard.navigate("/perfil"), Navigation::Redirect("/login".into()));
    }
}
