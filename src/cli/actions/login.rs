use crate::auth::{camera::ImageFileCamera, AuthFlow, LoginCredentials};
use crate::cli::{actions::face, globals::GlobalArgs};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
    pub image: PathBuf,
}

/// Execute the login action.
/// # Errors
/// Returns an error if validation, capture or the backend rejects the attempt.
pub async fn execute(args: Args) -> Result<()> {
    let backend = args.globals.backend()?;
    let sessions = args.globals.sessions();

    let flow = AuthFlow::login(
        ImageFileCamera::new(&args.image),
        LoginCredentials::new(args.email, args.password.expose_secret()),
    );

    let target = face::run(flow, &backend, &sessions).await?;
    info!(redirect = target, "signed in");
    println!("Redirect: {target}");

    Ok(())
}
