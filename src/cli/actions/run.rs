use crate::cli::actions::{login, logout, menu, navigate, register, whoami, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::Logout(args) => logout::execute(&args),
        Action::Whoami(args) => whoami::execute(&args),
        Action::Navigate(args) => navigate::execute(&args),
        Action::Menu(args) => menu::execute(&args),
    }
}
