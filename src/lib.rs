//! # InternHub client core
//!
//! `internhub` holds the client-side pieces of the InternHub internship platform
//! that carry real control flow: who is signed in, which views they may open, and
//! the credential + face-capture sequence used by both login and registration.
//!
//! ## Components
//!
//! 1. **Session Store** ([`session`]): an opaque token and a role tag persisted in a
//!    two-key store that survives restarts.
//! 2. **Access Guard** ([`access`]): a pure render/redirect decision taken on every
//!    navigation against a route's allowed roles.
//! 3. **Auth Flow Controller** ([`auth`]): `Credentials → Capture → Confirm`, with
//!    validation gates, scoped camera acquisition and a single in-flight submission
//!    to the backend.
//!
//! The dashboard menu ([`nav`]) is a pure function of the role so it can be tested
//! without rendering anything.
//!
//! Access control here is UX only. The backend remains the authority on tokens.

pub mod access;
pub mod auth;
pub mod cli;
pub mod nav;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub(crate) mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
