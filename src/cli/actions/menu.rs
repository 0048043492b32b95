use crate::cli::globals::GlobalArgs;
use crate::nav::{nav_items, portal_title};
use crate::session::Role;
use anyhow::{bail, Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

#[must_use]
pub fn render(role: Role) -> String {
    let items = nav_items(role);
    let width = items
        .iter()
        .map(|item| item.label.len())
        .max()
        .unwrap_or_default();

    std::iter::once(portal_title(role))
        .chain(
            items
                .iter()
                .map(|item| format!("  {:width$}  {}", item.label, item.path)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the menu action.
/// # Errors
/// Returns an error if nobody is signed in, the role is unrecognized, or the
/// session cannot be read.
pub fn execute(args: &Args) -> Result<()> {
    let session = args
        .globals
        .sessions()
        .get()
        .with_context(|| format!("Could not read {}", args.globals.session_file.display()))?;

    if !session.is_authenticated() {
        bail!("Not signed in");
    }
    let Some(role) = session.known_role() else {
        bail!(
            "No menu for role {}",
            session.role.as_ref().map_or("", |tag| tag.as_str())
        );
    };

    println!("{}", render(role));

    Ok(())
}
