use crate::auth::{camera::ImageFileCamera, AuthFlow, RegistrationDetails};
use crate::cli::{actions::face, globals::GlobalArgs};
use crate::session::Role;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub role: Role,
    pub image: PathBuf,
}

/// Execute the register action. No session is written; the user signs in next.
/// # Errors
/// Returns an error if validation, capture or the backend rejects the attempt.
pub async fn execute(args: Args) -> Result<()> {
    let backend = args.globals.backend()?;
    let sessions = args.globals.sessions();

    let details = RegistrationDetails {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password: args.password.expose_secret().to_string(),
        role: args.role,
    };
    let flow = AuthFlow::register(ImageFileCamera::new(&args.image), details);

    let target = face::run(flow, &backend, &sessions).await?;
    println!("Redirect: {target}");

    Ok(())
}
