//! Login and registration: credential validation, face capture and the single
//! backend submission that ends each attempt.

pub mod camera;
pub mod client;
pub mod flow;
pub mod notify;
pub mod types;
pub mod validate;

pub use camera::{Acquisition, Camera, CameraError, CapturedImage, FrameSource};
pub use client::{AuthBackend, BackendError, BackendFuture, HttpBackend};
pub use flow::{AuthFlow, BackendReply, Completion, FlowError, FlowEvent, FlowKind, Status, Step};
pub use notify::{Notification, NotificationKind};
pub use types::{
    Credentials, LoginCredentials, LoginRequest, LoginResponse, RegisterRequest,
    RegistrationDetails,
};
pub use validate::{Field, ValidationErrors};
