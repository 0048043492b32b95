pub mod login;
pub mod logout;
pub mod menu;
pub mod navigate;
pub mod register;
pub mod whoami;

mod face;

// Internal "interpreter" for `Action`; the match lives in `run::execute`.
mod run;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Register(register::Args),
    Logout(logout::Args),
    Whoami(whoami::Args),
    Navigate(navigate::Args),
    Menu(menu::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
