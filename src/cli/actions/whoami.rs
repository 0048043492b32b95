use crate::cli::globals::GlobalArgs;
use crate::session::{RoleTag, Session};
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// One-line summary of the session. The token itself is never shown.
#[must_use]
pub fn describe(session: &Session) -> String {
    match (&session.token, &session.role) {
        (Some(_), Some(RoleTag::Known(role))) => format!("Signed in as {role}"),
        (Some(_), Some(RoleTag::Unknown(tag))) => {
            format!("Signed in with unrecognized role {tag}; protected routes show not found")
        }
        (Some(_), None) => "Token present but no role; protected routes redirect home".to_string(),
        (None, Some(tag)) => {
            format!("Role {tag} stored without a token; protected routes redirect home")
        }
        (None, None) => "Not signed in".to_string(),
    }
}

/// Execute the whoami action.
/// # Errors
/// Returns an error if the session file cannot be read.
pub fn execute(args: &Args) -> Result<()> {
    let session = args
        .globals
        .sessions()
        .get()
        .with_context(|| format!("Could not read {}", args.globals.session_file.display()))?;

    println!("{}", describe(&session));

    Ok(())
}
