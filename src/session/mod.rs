//! Session state for the signed-in actor. The store keeps exactly two string keys,
//! `token` and `role`, in a [`KeyValueStore`]; both absent means logged out.
//! The token is opaque and trusted until the backend rejects it, so nothing here
//! expires, refreshes or revokes it. Token material must never be logged.

mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, instrument, warn};

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";

/// Authorization tag attached to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Hr,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Hr, Role::Admin];

    /// Parses a wire tag. Unknown tags are treated as "no role".
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "student" => Some(Self::Student),
            "hr" => Some(Self::Hr),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Hr => "hr",
            Self::Admin => "admin",
        }
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_tag(value).ok_or_else(|| format!("unknown role: {value}"))
    }
}

/// Stored role as read back: a known [`Role`] or a tag this client does not
/// recognize. An unrecognized tag is still a role; it just matches no policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleTag {
    Known(Role),
    Unknown(String),
}

impl RoleTag {
    /// Blank tags are no role at all.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Role::from_tag(trimmed).map_or_else(|| Self::Unknown(trimmed.to_string()), Self::Known))
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Known(role) => Some(*role),
            Self::Unknown(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(role) => role.as_str(),
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<Role> for RoleTag {
    fn from(role: Role) -> Self {
        Self::Known(role)
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Snapshot of the persisted session.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub token: Option<SecretString>,
    pub role: Option<RoleTag>,
}

impl Session {
    /// A role without a token is not a session.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.role.is_some()
    }

    /// The stored role if this client recognizes it.
    #[must_use]
    pub fn known_role(&self) -> Option<Role> {
        self.role.as_ref().and_then(RoleTag::role)
    }
}

/// Single source of truth for who is signed in, backed by an injected store.
#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes both keys in one batch. Stores that cannot batch atomically may
    /// fail halfway; the token is then rolled back so a reader never sees it
    /// without the role it was issued with.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be written.
    #[instrument(skip_all)]
    pub fn set(&self, token: &str, role: impl AsRef<str>) -> Result<(), StorageError> {
        let role = role.as_ref();
        let previous = self.store.get(TOKEN_KEY)?;

        if let Err(err) = self.store.set_many(&[(TOKEN_KEY, token), (ROLE_KEY, role)]) {
            warn!("session write failed, rolling back token");
            let rollback = match previous {
                Some(value) => self.store.set(TOKEN_KEY, &value),
                None => self.store.remove(TOKEN_KEY),
            };
            if let Err(rollback_err) = rollback {
                warn!("token rollback failed: {rollback_err}");
            }
            return Err(err);
        }

        debug!(role, "session stored");
        Ok(())
    }

    /// Reads the current session. A missing or blank key comes back absent; an
    /// unrecognized role tag comes back as [`RoleTag::Unknown`].
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read.
    pub fn get(&self) -> Result<Session, StorageError> {
        let token = self
            .store
            .get(TOKEN_KEY)?
            .filter(|value| !value.is_empty())
            .map(SecretString::from);
        let role = self
            .store
            .get(ROLE_KEY)?
            .as_deref()
            .and_then(RoleTag::parse);

        Ok(Session { token, role })
    }

    /// Removes both keys.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(ROLE_KEY)?;
        debug!("session cleared");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
