//! Backend collaborator for `/login` and `/register`. Each call is a single
//! attempt: no retries and no backoff; the timeout is the transport's. Request
//! bodies carry passwords and face images and must never be logged.

use super::types::{ErrorBody, LoginRequest, LoginResponse, RegisterRequest};
use crate::APP_USER_AGENT;
use reqwest::{Client, Response, StatusCode};
use std::{future::Future, pin::Pin, time::Duration};
use thiserror::Error;
use tracing::{debug, error, instrument};
use url::Url;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("email already exists")]
    EmailExists,
    #[error("face already registered")]
    FaceAlreadyRegistered,
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("backend misconfigured: {0}")]
    Config(String),
}

impl BackendError {
    /// Classifies a rejection by the reason the backend gave.
    #[must_use]
    pub fn from_rejection(status: u16, reason: &str) -> Self {
        let lowered = reason.to_lowercase();
        if lowered.contains("face") && lowered.contains("already") {
            Self::FaceAlreadyRegistered
        } else if lowered.contains("already exists") || lowered.contains("already registered") {
            Self::EmailExists
        } else {
            Self::Rejected {
                status,
                message: sanitize(reason),
            }
        }
    }
}

/// Auth endpoints consumed by the flows.
pub trait AuthBackend: Send + Sync {
    fn login<'a>(&'a self, request: &'a LoginRequest) -> BackendFuture<'a, LoginResponse>;

    fn register<'a>(&'a self, request: &'a RegisterRequest) -> BackendFuture<'a, ()>;
}

/// JSON-over-HTTP backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// # Errors
    /// Returns an error if the URL is not http(s) or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| BackendError::Config(format!("invalid API URL: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(BackendError::Config(format!(
                "unsupported scheme {}",
                base_url.scheme()
            )));
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn post_login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let url = self.endpoint("/login");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(map_request_error)?;
        let response = ensure_success(response).await?;

        response.json::<LoginResponse>().await.map_err(|err| {
            error!("login response could not be decoded: {err}");
            BackendError::Malformed(format!("Failed to decode response: {err}"))
        })
    }

    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    async fn post_register(&self, request: &RegisterRequest) -> Result<(), BackendError> {
        let url = self.endpoint("/register");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(map_request_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

impl AuthBackend for HttpBackend {
    fn login<'a>(&'a self, request: &'a LoginRequest) -> BackendFuture<'a, LoginResponse> {
        Box::pin(self.post_login(request))
    }

    fn register<'a>(&'a self, request: &'a RegisterRequest) -> BackendFuture<'a, ()> {
        Box::pin(self.post_register(request))
    }
}

fn map_request_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Transport("Request timed out. Please try again.".to_string())
    } else {
        BackendError::Transport(format!("Unable to reach the server: {err}"))
    }
}

/// Passes 2xx responses through and turns everything else into a classified error.
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        debug!(status = status.as_u16(), "backend accepted request");
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::reason)
        .unwrap_or_else(|| body.trim().to_string());

    debug!(status = status.as_u16(), "backend rejected request");
    Err(BackendError::from_rejection(status.as_u16(), &reason_or_status(&reason, status)))
}

fn reason_or_status(reason: &str, status: StatusCode) -> String {
    if reason.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed.")
            .to_string()
    } else {
        reason.to_string()
    }
}

/// Trims and truncates error bodies before they reach the user.
fn sanitize(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
