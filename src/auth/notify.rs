//! Non-blocking user notifications (toasts) raised by the auth flows.

use super::client::BackendError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notification {
    const fn success(title: &'static str, description: &'static str) -> Self {
        Self {
            kind: NotificationKind::Success,
            title,
            description,
        }
    }

    const fn error(title: &'static str, description: &'static str) -> Self {
        Self {
            kind: NotificationKind::Error,
            title,
            description,
        }
    }

    #[must_use]
    pub const fn login_succeeded() -> Self {
        Self::success("Login successful", "Welcome back!")
    }

    /// Login failures are never told apart for the user.
    #[must_use]
    pub const fn login_failed() -> Self {
        Self::error(
            "Login failed",
            "Please check your credentials and try again.",
        )
    }

    #[must_use]
    pub const fn registration_succeeded() -> Self {
        Self::success(
            "Registration successful",
            "Your account has been created successfully.",
        )
    }

    #[must_use]
    pub fn registration_failed(error: &BackendError) -> Self {
        let description = match error {
            BackendError::EmailExists => {
                "The email you entered is already registered. Please use a different email."
            }
            BackendError::FaceAlreadyRegistered => {
                "This face is already registered to another account."
            }
            _ => "Something went wrong. Please try again.",
        };
        Self::error("Registration failed", description)
    }

    #[must_use]
    pub const fn camera_unavailable() -> Self {
        Self::error(
            "Camera unavailable",
            "Camera access denied or not available. Please check your device permissions.",
        )
    }

    #[must_use]
    pub const fn face_capture_required() -> Self {
        Self::error(
            "Face capture required",
            "Please capture your face to proceed.",
        )
    }

    #[must_use]
    pub const fn session_not_saved() -> Self {
        Self::error(
            "Login failed",
            "Your session could not be saved. Please try again.",
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.title, self.description)
    }
}
