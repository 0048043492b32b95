mod logging;

pub use logging::validator_log_level;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

fn validator_api_url(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|err| format!("invalid URL: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(value.to_string()),
        scheme => Err(format!("unsupported scheme: {scheme}")),
    }
}

fn validator_role(value: &str) -> Result<String, String> {
    match value.trim().to_lowercase().as_str() {
        role @ ("student" | "hr") => Ok(role.to_string()),
        _ => Err("role must be student or hr".to_string()),
    }
}

fn email_arg() -> Arg {
    Arg::new("email")
        .short('e')
        .long("email")
        .help("Account email")
        .env("INTERNHUB_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new("password")
        .short('p')
        .long("password")
        .help("Account password")
        .env("INTERNHUB_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn image_arg() -> Arg {
    Arg::new("image")
        .short('i')
        .long("image")
        .help("JPEG or PNG file used as the face capture")
        .value_parser(clap::value_parser!(std::path::PathBuf))
        .required(true)
}

fn subcommands() -> [Command; 6] {
    [
        Command::new("login")
            .about("Sign in with credentials and a face capture")
            .arg(email_arg())
            .arg(password_arg())
            .arg(image_arg()),
        Command::new("register")
            .about("Create a student or hr account")
            .arg(
                Arg::new("first-name")
                    .long("first-name")
                    .help("First name")
                    .required(true),
            )
            .arg(
                Arg::new("last-name")
                    .long("last-name")
                    .help("Last name")
                    .required(true),
            )
            .arg(email_arg())
            .arg(password_arg())
            .arg(
                Arg::new("role")
                    .short('r')
                    .long("role")
                    .help("Account role")
                    .default_value("student")
                    .value_parser(validator_role),
            )
            .arg(image_arg()),
        Command::new("logout").about("Clear the stored session"),
        Command::new("whoami").about("Show the stored session without revealing the token"),
        Command::new("navigate")
            .about("Resolve a path against the route guards for the stored session")
            .arg(Arg::new("path").help("Path to open, e.g. /hr/dashboard").required(true)),
        Command::new("menu").about("List the dashboard menu for the stored role"),
    ]
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("internhub")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the InternHub API")
                .default_value(DEFAULT_API_URL)
                .env("INTERNHUB_API_URL")
                .global(true)
                .value_parser(validator_api_url),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Where the session is kept between runs (default: $XDG_CONFIG_HOME/internhub/session.json)")
                .env("INTERNHUB_SESSION_FILE")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("INTERNHUB_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommands(subcommands());

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const LOGIN: [&str; 8] = [
        "internhub",
        "login",
        "--email",
        "a@b.com",
        "--password",
        "Aa1!aaaa",
        "--image",
        "face.jpg",
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "internhub");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars_unset(
            ["INTERNHUB_API_URL", "INTERNHUB_TIMEOUT", "INTERNHUB_LOG_LEVEL"],
            || {
                let matches = new().get_matches_from(LOGIN);

                assert_eq!(
                    matches.get_one::<String>("api-url").cloned(),
                    Some(DEFAULT_API_URL.to_string())
                );
                assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(10));

                let Some(("login", sub)) = matches.subcommand() else {
                    panic!("expected login subcommand");
                };
                assert_eq!(sub.get_one::<String>("email").cloned(), Some("a@b.com".to_string()));
                assert_eq!(
                    sub.get_one::<PathBuf>("image").cloned(),
                    Some(PathBuf::from("face.jpg"))
                );
            },
        );
    }

    #[test]
    fn test_register_role() {
        let base = [
            "internhub",
            "register",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--email",
            "ada@example.com",
            "--password",
            "Aa1!aaaa",
            "--image",
            "face.jpg",
        ];

        let matches = new().get_matches_from(base);
        let Some(("register", sub)) = matches.subcommand() else {
            panic!("expected register subcommand");
        };
        assert_eq!(sub.get_one::<String>("role").cloned(), Some("student".to_string()));

        let mut args = base.to_vec();
        args.extend(["--role", "HR"]);
        let matches = new().get_matches_from(args);
        let Some(("register", sub)) = matches.subcommand() else {
            panic!("expected register subcommand");
        };
        assert_eq!(sub.get_one::<String>("role").cloned(), Some("hr".to_string()));

        let mut args = base.to_vec();
        args.extend(["--role", "admin"]);
        assert!(new().try_get_matches_from(args).is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("INTERNHUB_API_URL", Some("https://api.internhub.dev")),
                ("INTERNHUB_SESSION_FILE", Some("/tmp/internhub-session.json")),
                ("INTERNHUB_TIMEOUT", Some("3")),
                ("INTERNHUB_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(["internhub", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>("api-url").cloned(),
                    Some("https://api.internhub.dev".to_string())
                );
                assert_eq!(
                    matches.get_one::<PathBuf>("session-file").cloned(),
                    Some(PathBuf::from("/tmp/internhub-session.json"))
                );
                assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(3));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_credentials_from_env() {
        temp_env::with_vars(
            [
                ("INTERNHUB_EMAIL", Some("a@b.com")),
                ("INTERNHUB_PASSWORD", Some("Aa1!aaaa")),
            ],
            || {
                let matches =
                    new().get_matches_from(["internhub", "login", "--image", "face.jpg"]);
                let Some(("login", sub)) = matches.subcommand() else {
                    panic!("expected login subcommand");
                };
                assert_eq!(
                    sub.get_one::<String>("password").cloned(),
                    Some("Aa1!aaaa".to_string())
                );
            },
        );
    }

    #[test]
    fn test_invalid_api_url() {
        temp_env::with_vars_unset(["INTERNHUB_API_URL"], || {
            assert!(new()
                .try_get_matches_from(["internhub", "--api-url", "ftp://host", "whoami"])
                .is_err());
            assert!(new()
                .try_get_matches_from(["internhub", "--api-url", "not a url", "whoami"])
                .is_err());
        });
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("INTERNHUB_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(["internhub", "menu"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_log_level_env_bounds() {
        temp_env::with_vars([("INTERNHUB_LOG_LEVEL", Some("4"))], || {
            let matches = new().get_matches_from(["internhub", "menu"]);
            assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(4));
        });
        temp_env::with_vars([("INTERNHUB_LOG_LEVEL", Some("5"))], || {
            assert!(new().try_get_matches_from(["internhub", "menu"]).is_err());
        });
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("INTERNHUB_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["internhub".to_string(), "menu".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(new().try_get_matches_from(["internhub"]).is_err());
    }
}
