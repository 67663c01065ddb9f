//! Capability checks.

use crate::auth::{Role, Session, SessionState};

/// What a route or action demands of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Requirement {
    #[default]
    Public,
    Authenticated,
    /// Logged in with one of `allowed`
    Role { allowed: Vec<Role> },
}

impl Requirement {
    pub fn role(allowed: &[Role]) -> Self {
        Requirement::Role {
            allowed: allowed.to_vec(),
        }
    }

    pub fn admin() -> Self {
        Self::role(&[Role::Administrator])
    }

    pub fn teacher_or_admin() -> Self {
        Self::role(&[Role::Teacher, Role::Administrator])
    }
}

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No session; the user must log in
    NeedsLogin,
    /// Logged in without a suitable role
    Forbidden,
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Access::Granted
    }
}

/// Check `requirement` against the current session
pub fn can_access(session: &Session, requirement: &Requirement) -> Access {
    evaluate(&session.snapshot(), requirement)
}

pub(crate) fn evaluate(state: &SessionState, requirement: &Requirement) -> Access {
    match (requirement, &state.user) {
        (Requirement::Public, _) => Access::Granted,
        (_, None) => Access::NeedsLogin,
        (Requirement::Authenticated, Some(_)) => Access::Granted,
        (Requirement::Role { allowed }, Some(user)) if allowed.contains(&user.role) => {
            Access::Granted
        }
        (Requirement::Role { .. }, Some(_)) => Access::Forbidden,
    }
}
