use crate::access::{Navigation, RouteTable};
use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub path: String,
}

#[must_use]
pub fn describe(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Render(path) => format!("Render: {path}"),
        Navigation::Redirect(target) => format!("Redirect: {target}"),
        Navigation::NotFound => "Not found".to_string(),
    }
}

/// Execute the navigate action.
/// # Errors
/// Returns an error if the session cannot be read or the route table is invalid.
pub fn execute(args: &Args) -> Result<()> {
    let session = args
        .globals
        .sessions()
        .get()
        .with_context(|| format!("Could not read {}", args.globals.session_file.display()))?;
    let routes = RouteTable::standard()?;

    println!("{}", describe(&routes.navigate(&args.path, &session)));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::paths;
    use crate::session::{MemoryStore, SessionStore};

    #[test]
    fn describe_navigation() -> Result<()> {
        let routes = RouteTable::standard()?;
        let sessions = SessionStore::new(MemoryStore::default());

        assert_eq!(
            describe(&routes.navigate(paths::HR_DASHBOARD, &sessions.get()?)),
            "Redirect: /"
        );

        sessions.set("xyz", "student")?;
        let session = sessions.get()?;
        assert_eq!(
            describe(&routes.navigate(paths::HR_DASHBOARD, &session)),
            "Redirect: /404"
        );
        assert_eq!(
            describe(&routes.navigate(paths::STUDENT_DASHBOARD, &session)),
            format!("Render: {}", paths::STUDENT_DASHBOARD)
        );
        assert_eq!(describe(&routes.navigate("/nowhere", &session)), "Not found");
        Ok(())
    }
}
