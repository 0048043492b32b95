//! Runs an [`AuthFlow`] end to end without user interaction: credentials, one
//! capture, one submission.

use crate::auth::{
    AuthBackend, AuthFlow, Camera, Completion, FlowError, Notification, NotificationKind,
};
use crate::session::{KeyValueStore, SessionStore};
use anyhow::{anyhow, Result};
use tracing::debug;

pub(crate) async fn run<C, B, S>(
    mut flow: AuthFlow<C>,
    backend: &B,
    sessions: &SessionStore<S>,
) -> Result<&'static str>
where
    C: Camera,
    B: AuthBackend + ?Sized,
    S: KeyValueStore,
{
    match flow.submit_credentials() {
        Ok(()) => {}
        Err(FlowError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            return Err(anyhow!("{} field(s) need attention", errors.len()));
        }
        Err(err) => return Err(err.into()),
    }

    if let Err(err) = flow.capture() {
        debug!("capture step failed: {err}");
        return Err(failure(flow.take_notifications(), err.to_string()));
    }

    let completion = flow.submit(backend, sessions).await?;
    let notifications = flow.take_notifications();

    match completion {
        Completion::Navigate(target) => {
            for notification in &notifications {
                println!("{notification}");
            }
            Ok(target)
        }
        Completion::Failed => Err(failure(notifications, "submission failed".to_string())),
    }
}

/// Prints all but the last error notification; the last one becomes the error.
fn failure(notifications: Vec<Notification>, fallback: String) -> anyhow::Error {
    let mut errors: Vec<Notification> = notifications
        .into_iter()
        .filter(|notification| notification.kind == NotificationKind::Error)
        .collect();

    let Some(last) = errors.pop() else {
        return anyhow!(fallback);
    };
    for notification in &errors {
        eprintln!("{notification}");
    }
    anyhow!("{last}")
}
