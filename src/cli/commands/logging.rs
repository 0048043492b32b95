//! The global `-v` flag. Repeats count up from ERROR; `INTERNHUB_LOG_LEVEL`
//! takes either a level name or its index.

use clap::{builder::ValueParser, Arg, ArgAction, Command};

/// Level names by verbosity index, quietest first.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn parse_level(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let index = match value.parse::<usize>() {
        Ok(index) => Some(index).filter(|&index| index < LEVELS.len()),
        Err(_) => LEVELS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(value)),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level '{value}': expected 0-{} or one of {}",
                LEVELS.len() - 1,
                LEVELS.join(", ")
            )
        })
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_level)
}

pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new("verbosity")
            .short('v')
            .long("verbose")
            .help("Log verbosity, repeat for more: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("INTERNHUB_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_indexes_agree() {
        for (index, name) in LEVELS.iter().enumerate() {
            assert_eq!(parse_level(name), parse_level(&index.to_string()));
        }
        assert_eq!(parse_level("TRACE"), Ok(4));
        assert_eq!(parse_level(" debug "), Ok(3));
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        assert!(parse_level("5").is_err());
        assert!(parse_level("255").is_err());
        assert!(parse_level("-1").is_err());
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
    }
}
