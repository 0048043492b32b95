use crate::access::paths;
use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Execute the logout action: both session keys are removed and the user lands home.
/// # Errors
/// Returns an error if the session file cannot be written.
pub fn execute(args: &Args) -> Result<()> {
    args.globals
        .sessions()
        .clear()
        .with_context(|| format!("Could not clear {}", args.globals.session_file.display()))?;

    info!("signed out");
    println!("Redirect: {}", paths::HOME);

    Ok(())
}
