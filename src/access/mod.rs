//! Role-based view gating. The guard is a pure predicate over the current
//! [`Session`] and a route's [`RouteAccessPolicy`]; it is re-evaluated on every
//! navigation so a logout elsewhere takes effect on the next attempt.
//!
//! Wrong-role access is answered with the not-found view rather than a 403 so
//! protected routes cannot be enumerated. This is UX-only gating; the backend
//! still owns real access control.

pub mod paths;
mod routes;

pub use routes::{Navigation, RouteError, RouteTable};

use crate::session::{Role, Session};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("route access policy must allow at least one role")]
    EmptyRoles,
}

/// Roles allowed to render a protected view. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteAccessPolicy {
    allowed_roles: BTreeSet<Role>,
}

impl RouteAccessPolicy {
    /// # Errors
    /// Returns [`PolicyError::EmptyRoles`] when no role is given.
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Result<Self, PolicyError> {
        let allowed_roles: BTreeSet<Role> = roles.into_iter().collect();
        if allowed_roles.is_empty() {
            return Err(PolicyError::EmptyRoles);
        }
        Ok(Self { allowed_roles })
    }

    #[must_use]
    pub fn only(role: Role) -> Self {
        Self {
            allowed_roles: BTreeSet::from([role]),
        }
    }

    #[must_use]
    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    pub fn allowed_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.allowed_roles.iter().copied()
    }
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Render,
    RedirectHome,
    RedirectNotFound,
}

impl AccessDecision {
    /// Path to navigate to, or `None` when the view renders.
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::Render => None,
            Self::RedirectHome => Some(paths::HOME),
            Self::RedirectNotFound => Some(paths::NOT_FOUND),
        }
    }
}

/// Decides whether a protected view renders for the given session. A role tag
/// this client does not recognize is still a role, so it lands on not-found.
#[must_use]
pub fn guard(policy: &RouteAccessPolicy, session: &Session) -> AccessDecision {
    let (Some(_), Some(tag)) = (&session.token, &session.role) else {
        return AccessDecision::RedirectHome;
    };

    if tag.role().is_some_and(|role| policy.allows(role)) {
        AccessDecision::Render
    } else {
        AccessDecision::RedirectNotFound
    }
}
