use super::{guard, paths, AccessDecision, PolicyError, RouteAccessPolicy};
use crate::session::{Role, Session};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route already registered: {0}")]
    Duplicate(String),
    #[error("route path must start with '/': {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Result of resolving a navigation against the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(String),
    Redirect(&'static str),
    NotFound,
}

/// Every known path, public or protected. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Option<RouteAccessPolicy>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route surface of the InternHub client.
    ///
    /// # Errors
    /// Returns an error if a path is registered twice.
    pub fn standard() -> Result<Self, RouteError> {
        let student = RouteAccessPolicy::only(Role::Student);
        let hr = RouteAccessPolicy::only(Role::Hr);
        let admin = RouteAccessPolicy::only(Role::Admin);

        let mut table = Self::new();
        for path in [paths::HOME, paths::LOGIN, paths::REGISTER, paths::NOT_FOUND] {
            table.public(path)?;
        }
        for path in [
            paths::STUDENT_DASHBOARD,
            paths::STUDENT_PROFILE,
            paths::STUDENT_INTERNSHIPS,
            paths::STUDENT_APPLICATIONS,
        ] {
            table.register(path, student.clone())?;
        }
        for path in [
            paths::HR_DASHBOARD,
            paths::HR_PROFILE,
            paths::HR_POST,
            paths::HR_APPLICATIONS,
            paths::HR_COMPANY,
        ] {
            table.register(path, hr.clone())?;
        }
        for path in [
            paths::ADMIN_DASHBOARD,
            paths::ADMIN_USERS,
            paths::ADMIN_INTERNSHIPS,
            paths::ADMIN_COMPANIES,
        ] {
            table.register(path, admin.clone())?;
        }
        Ok(table)
    }

    /// Registers an always-renderable path.
    ///
    /// # Errors
    /// Returns an error if the path is malformed or already registered.
    pub fn public(&mut self, path: &str) -> Result<&mut Self, RouteError> {
        self.insert(path, None)
    }

    /// Registers a protected path with exactly one policy.
    ///
    /// # Errors
    /// Returns an error if the path is malformed or already registered.
    pub fn register(
        &mut self,
        path: &str,
        policy: RouteAccessPolicy,
    ) -> Result<&mut Self, RouteError> {
        self.insert(path, Some(policy))
    }

    fn insert(
        &mut self,
        path: &str,
        policy: Option<RouteAccessPolicy>,
    ) -> Result<&mut Self, RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath(path.to_string()));
        }
        let key = normalize(path);
        if self.routes.contains_key(&key) {
            return Err(RouteError::Duplicate(key));
        }
        self.routes.insert(key, policy);
        Ok(self)
    }

    /// Policy attached to `path`; `None` for public or unknown paths.
    #[must_use]
    pub fn policy(&self, path: &str) -> Option<&RouteAccessPolicy> {
        self.routes.get(&normalize(path)).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(&normalize(path))
    }

    /// Resolves a navigation for the current session. Unknown paths fall through
    /// to the not-found view.
    #[must_use]
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        let key = normalize(path);
        let navigation = match self.routes.get(&key) {
            None => Navigation::NotFound,
            Some(None) => Navigation::Render(key.clone()),
            Some(Some(policy)) => match guard(policy, session) {
                AccessDecision::Render => Navigation::Render(key.clone()),
                AccessDecision::RedirectHome => Navigation::Redirect(paths::HOME),
                AccessDecision::RedirectNotFound => Navigation::Redirect(paths::NOT_FOUND),
            },
        };
        debug!(path = %key, ?navigation, "navigation resolved");
        navigation
    }
}

/// Drops query, fragment and trailing slashes.
fn normalize(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        paths::HOME.to_string()
    } else {
        trimmed.to_string()
    }
}
