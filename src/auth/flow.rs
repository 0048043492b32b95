//! Three-step auth flow shared by login and registration:
//! `Credentials → Capture → Confirm`, then one submission to the backend.
//!
//! Synchronous user events go through [`AuthFlow::handle`]. Submission is split
//! into [`AuthFlow::begin_submit`] and [`AuthFlow::complete_submit`] so a UI can
//! disable the confirm action while the request is in flight; [`AuthFlow::submit`]
//! runs both around a backend call.
//!
//! Invariants:
//! - the step only advances when the current step's checks pass;
//! - `Confirm` always carries the captured image;
//! - a failed submission keeps every entered field and the image for retry;
//! - the session is written only after a successful login response, and the
//!   navigation target is produced only after that write.

use super::camera::{Acquisition, Camera, CameraError, CapturedImage};
use super::client::{AuthBackend, BackendError};
use super::notify::Notification;
use super::types::{
    Credentials, LoginCredentials, LoginRequest, LoginResponse, RegisterRequest,
    RegistrationDetails,
};
use super::validate::{self, Field, ValidationErrors};
use crate::access::paths;
use crate::session::{KeyValueStore, Role, SessionStore};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowKind {
    Login,
    Register,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Credentials,
    Capture,
    Confirm { image: CapturedImage },
}

impl Step {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Capture => "capture",
            Self::Confirm { .. } => "confirm",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

/// User actions outside of submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// "Next: Capture Face".
    SubmitCredentials,
    /// "Try Again" after the device was denied or missing.
    RetryCamera,
    /// Take the still.
    Capture,
    /// "Back to Credentials".
    Back,
    /// "Retake Photo" from the confirm step.
    Retake,
}

impl FlowEvent {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SubmitCredentials => "submit credentials",
            Self::RetryCamera => "retry camera",
            Self::Capture => "capture",
            Self::Back => "back",
            Self::Retake => "retake",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot {event} during the {step} step")]
    InvalidTransition {
        step: &'static str,
        event: &'static str,
    },
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),
    #[error("camera: {0}")]
    Camera(CameraError),
    #[error("{0} is not part of this form")]
    UnknownField(Field),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: Field, value: String },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error("the flow has already completed")]
    Finished,
}

/// Payload handed to the backend by [`AuthFlow::begin_submit`].
#[derive(Clone, Debug)]
pub enum SubmitRequest {
    Login(LoginRequest),
    Register(RegisterRequest),
}

/// What the backend answered.
#[derive(Clone, Debug)]
pub enum BackendReply {
    LoggedIn(LoginResponse),
    Registered,
}

/// Result of a completed submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Success; the caller should navigate here.
    Navigate(&'static str),
    /// Failure; the flow stays on `Confirm` and may be retried.
    Failed,
}

/// One login or registration attempt.
pub struct AuthFlow<C: Camera> {
    camera: C,
    acquisition: Option<Acquisition<C::Source>>,
    credentials: Credentials,
    step: Step,
    status: Status,
    errors: ValidationErrors,
    capture_error: Option<CameraError>,
    notifications: Vec<Notification>,
}

impl<C: Camera> AuthFlow<C> {
    pub fn login(camera: C, credentials: LoginCredentials) -> Self {
        Self::new(camera, Credentials::Login(credentials))
    }

    pub fn register(camera: C, details: RegistrationDetails) -> Self {
        Self::new(camera, Credentials::Register(details))
    }

    fn new(camera: C, credentials: Credentials) -> Self {
        Self {
            camera,
            acquisition: None,
            credentials,
            step: Step::Credentials,
            status: Status::Editing,
            errors: ValidationErrors::default(),
            capture_error: None,
            notifications: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FlowKind {
        match self.credentials {
            Credentials::Login(_) => FlowKind::Login,
            Credentials::Register(_) => FlowKind::Register,
        }
    }

    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// True while a submission is in flight; the confirm action must be disabled.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.status == Status::Submitting
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Device failure surfaced at the capture step, if any.
    #[must_use]
    pub fn capture_error(&self) -> Option<&CameraError> {
        self.capture_error.as_ref()
    }

    #[must_use]
    pub fn captured_image(&self) -> Option<&CapturedImage> {
        match &self.step {
            Step::Confirm { image } => Some(image),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_active_camera(&self) -> bool {
        self.acquisition.is_some()
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drains pending notifications for display.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Edits a form field. Editing clears that field's error.
    ///
    /// # Errors
    /// Fails outside the credentials step, for fields this form lacks, or for an
    /// unparseable role.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), FlowError> {
        self.ensure_open()?;
        if self.step != Step::Credentials {
            return Err(FlowError::InvalidTransition {
                step: self.step.name(),
                event: "edit",
            });
        }

        match (&mut self.credentials, field) {
            (Credentials::Login(credentials), Field::Email) => credentials.email = value.to_string(),
            (Credentials::Login(credentials), Field::Password) => {
                credentials.password = value.to_string();
            }
            (Credentials::Login(_), other) => return Err(FlowError::UnknownField(other)),
            (Credentials::Register(details), Field::FirstName) => {
                details.first_name = value.to_string();
            }
            (Credentials::Register(details), Field::LastName) => {
                details.last_name = value.to_string();
            }
            (Credentials::Register(details), Field::Email) => details.email = value.to_string(),
            (Credentials::Register(details), Field::Password) => {
                details.password = value.to_string();
            }
            (Credentials::Register(details), Field::Role) => {
                details.role = Role::from_tag(value).ok_or_else(|| FlowError::InvalidValue {
                    field,
                    value: value.to_string(),
                })?;
            }
        }

        self.errors.clear_field(field);
        Ok(())
    }

    /// Single transition function for user events.
    ///
    /// # Errors
    /// Returns [`FlowError::InvalidTransition`] when the event does not apply to
    /// the current step, [`FlowError::Validation`] when credentials are rejected,
    /// and [`FlowError::Camera`] when no frame could be taken.
    #[instrument(skip(self), fields(kind = ?self.kind(), step = self.step.name()))]
    pub fn handle(&mut self, event: FlowEvent) -> Result<(), FlowError> {
        self.ensure_open()?;

        match (&self.step, event) {
            (Step::Credentials, FlowEvent::SubmitCredentials) => self.check_credentials(),
            (Step::Capture, FlowEvent::RetryCamera) => {
                self.acquire_camera();
                Ok(())
            }
            (Step::Capture, FlowEvent::Capture) => self.take_still(),
            (Step::Capture, FlowEvent::Back) => {
                self.release_camera();
                self.capture_error = None;
                self.step = Step::Credentials;
                Ok(())
            }
            (Step::Confirm { .. }, FlowEvent::Retake) => {
                self.status = Status::Editing;
                self.step = Step::Capture;
                self.acquire_camera();
                Ok(())
            }
            (step, event) => Err(FlowError::InvalidTransition {
                step: step.name(),
                event: event.name(),
            }),
        }
    }

    pub fn submit_credentials(&mut self) -> Result<(), FlowError> {
        self.handle(FlowEvent::SubmitCredentials)
    }

    pub fn retry_camera(&mut self) -> Result<(), FlowError> {
        self.handle(FlowEvent::RetryCamera)
    }

    pub fn capture(&mut self) -> Result<(), FlowError> {
        self.handle(FlowEvent::Capture)
    }

    pub fn back(&mut self) -> Result<(), FlowError> {
        self.handle(FlowEvent::Back)
    }

    pub fn retake(&mut self) -> Result<(), FlowError> {
        self.handle(FlowEvent::Retake)
    }

    /// Marks the flow as submitting and returns the payload to send. Accepted
    /// once per attempt: a second call before [`Self::complete_submit`] fails.
    ///
    /// # Errors
    /// Fails while a submission is in flight, after success, or outside `Confirm`.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, FlowError> {
        self.ensure_open()?;

        let Step::Confirm { image } = &self.step else {
            self.notifications.push(Notification::face_capture_required());
            return Err(FlowError::InvalidTransition {
                step: self.step.name(),
                event: "submit",
            });
        };
        let image = image.as_str().to_string();

        let request = match &self.credentials {
            Credentials::Login(credentials) => SubmitRequest::Login(LoginRequest {
                email: credentials.email.trim().to_string(),
                password: credentials.password.clone(),
                image,
            }),
            Credentials::Register(details) => SubmitRequest::Register(RegisterRequest {
                first_name: details.first_name.trim().to_string(),
                last_name: details.last_name.trim().to_string(),
                email: details.email.trim().to_string(),
                password: details.password.clone(),
                role: details.role,
                image,
            }),
        };

        self.status = Status::Submitting;
        debug!(kind = ?self.kind(), "submission started");
        Ok(request)
    }

    /// Applies the backend's answer. Login success writes the session before the
    /// navigation target is returned.
    ///
    /// # Errors
    /// Returns [`FlowError::NotSubmitting`] if no submission is in flight.
    pub fn complete_submit<S: KeyValueStore>(
        &mut self,
        reply: Result<BackendReply, BackendError>,
        sessions: &SessionStore<S>,
    ) -> Result<Completion, FlowError> {
        if self.status != Status::Submitting {
            return Err(FlowError::NotSubmitting);
        }

        let kind = self.kind();
        match (kind, reply) {
            (FlowKind::Login, Ok(BackendReply::LoggedIn(response))) => {
                Ok(self.finish_login(&response, sessions))
            }
            (FlowKind::Register, Ok(BackendReply::Registered)) => {
                info!("registration accepted");
                self.succeed(Notification::registration_succeeded());
                Ok(Completion::Navigate(paths::LOGIN))
            }
            (_, Ok(_)) => {
                warn!(?kind, "backend reply does not match the flow kind");
                Ok(self.fail(&BackendError::Malformed(
                    "unexpected reply for this flow".to_string(),
                )))
            }
            (_, Err(err)) => Ok(self.fail(&err)),
        }
    }

    /// Runs one submission against `backend`.
    ///
    /// # Errors
    /// Fails only when the flow is not ready to submit; backend failures come
    /// back as [`Completion::Failed`].
    pub async fn submit<B, S>(
        &mut self,
        backend: &B,
        sessions: &SessionStore<S>,
    ) -> Result<Completion, FlowError>
    where
        B: AuthBackend + ?Sized,
        S: KeyValueStore,
    {
        let request = self.begin_submit()?;
        let reply = match &request {
            SubmitRequest::Login(request) => {
                backend.login(request).await.map(BackendReply::LoggedIn)
            }
            SubmitRequest::Register(request) => backend
                .register(request)
                .await
                .map(|()| BackendReply::Registered),
        };
        self.complete_submit(reply, sessions)
    }

    fn finish_login<S: KeyValueStore>(
        &mut self,
        response: &LoginResponse,
        sessions: &SessionStore<S>,
    ) -> Completion {
        // The token is opaque: stored exactly as received.
        let token = response.access_token.as_str();
        if token.is_empty() {
            return self.fail(&BackendError::Malformed(
                "login response has no access token".to_string(),
            ));
        }
        // A missing role is stored blank and falls to the student dashboard.
        let role = response.role.as_deref().unwrap_or_default();

        if let Err(err) = sessions.set(token, role) {
            warn!("session could not be stored: {err}");
            self.status = Status::Failed;
            self.notifications.push(Notification::session_not_saved());
            return Completion::Failed;
        }

        let target = paths::dashboard_for(role);
        info!(role, redirect = target, "login accepted");
        self.succeed(Notification::login_succeeded());
        Completion::Navigate(target)
    }

    fn succeed(&mut self, notification: Notification) {
        self.release_camera();
        self.status = Status::Succeeded;
        self.notifications.push(notification);
    }

    fn fail(&mut self, err: &BackendError) -> Completion {
        warn!(kind = ?self.kind(), "submission failed: {err}");
        self.status = Status::Failed;
        let notification = match self.kind() {
            FlowKind::Login => Notification::login_failed(),
            FlowKind::Register => Notification::registration_failed(err),
        };
        self.notifications.push(notification);
        Completion::Failed
    }

    fn ensure_open(&self) -> Result<(), FlowError> {
        match self.status {
            Status::Succeeded => Err(FlowError::Finished),
            Status::Submitting => Err(FlowError::SubmissionInFlight),
            Status::Editing | Status::Failed => Ok(()),
        }
    }

    fn check_credentials(&mut self) -> Result<(), FlowError> {
        let errors = validate::validate(&self.credentials);
        if !errors.is_empty() {
            debug!(fields = %errors, "credentials rejected");
            self.errors = errors.clone();
            return Err(FlowError::Validation(errors));
        }

        self.errors = ValidationErrors::default();
        self.step = Step::Capture;
        self.acquire_camera();
        Ok(())
    }

    /// At most one acquisition is held; any previous one is released first.
    fn acquire_camera(&mut self) {
        self.release_camera();
        match self.camera.acquire() {
            Ok(source) => {
                self.acquisition = Some(Acquisition::new(source));
                self.capture_error = None;
            }
            Err(err) => {
                warn!("camera acquisition failed: {err}");
                self.capture_error = Some(err);
                self.notifications.push(Notification::camera_unavailable());
            }
        }
    }

    fn release_camera(&mut self) {
        if let Some(mut acquisition) = self.acquisition.take() {
            acquisition.release();
        }
    }

    fn take_still(&mut self) -> Result<(), FlowError> {
        let Some(acquisition) = self.acquisition.as_mut() else {
            let err = self
                .capture_error
                .clone()
                .unwrap_or_else(|| CameraError::Unavailable("camera not acquired".to_string()));
            return Err(FlowError::Camera(err));
        };

        match acquisition.snapshot() {
            Ok(image) => {
                self.release_camera();
                self.capture_error = None;
                self.step = Step::Confirm { image };
                Ok(())
            }
            Err(err) => {
                warn!("frame capture failed: {err}");
                self.capture_error = Some(err.clone());
                self.notifications.push(Notification::camera_unavailable());
                Err(FlowError::Camera(err))
            }
        }
    }
}
