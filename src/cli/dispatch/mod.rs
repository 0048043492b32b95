use crate::cli::{
    actions::{login, logout, menu, navigate, register, whoami, Action},
    globals::GlobalArgs,
};
use crate::session::{FileStore, Role};
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;

    let session_file = matches
        .get_one::<PathBuf>("session-file")
        .cloned()
        .or_else(FileStore::default_path)
        .context("could not determine a session file, set --session-file or INTERNHUB_SESSION_FILE")?;

    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(10);

    Ok(GlobalArgs::new(
        api_url,
        session_file,
        Duration::from_secs(timeout),
    ))
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn image(matches: &ArgMatches) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>("image")
        .cloned()
        .context("missing required argument: --image")
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some(("login", sub)) => Ok(Action::Login(login::Args {
            globals,
            email: required(sub, "email")?,
            password: SecretString::from(required(sub, "password")?),
            image: image(sub)?,
        })),
        Some(("register", sub)) => {
            let role = sub
                .get_one::<String>("role")
                .map_or(Some(Role::Student), |tag| Role::from_tag(tag))
                .ok_or_else(|| anyhow!("role must be student or hr"))?;

            Ok(Action::Register(register::Args {
                globals,
                first_name: required(sub, "first-name")?,
                last_name: required(sub, "last-name")?,
                email: required(sub, "email")?,
                password: SecretString::from(required(sub, "password")?),
                role,
                image: image(sub)?,
            }))
        }
        Some(("logout", _)) => Ok(Action::Logout(logout::Args { globals })),
        Some(("whoami", _)) => Ok(Action::Whoami(whoami::Args { globals })),
        Some(("navigate", sub)) => Ok(Action::Navigate(navigate::Args {
            globals,
            path: sub
                .get_one::<String>("path")
                .cloned()
                .context("missing required argument: <path>")?,
        })),
        Some(("menu", _)) => Ok(Action::Menu(menu::Args { globals })),
        Some((other, _)) => bail!("unknown subcommand: {other}"),
        None => bail!("a subcommand is required"),
    }
}
