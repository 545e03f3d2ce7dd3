use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change draft defaults and the record store location",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

/// Keys accepted by `config set`.
pub(crate) const KEYS: &[&str] = &["country", "currency", "check_in", "check_out", "store_root"];

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_config_value(context, key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`"
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  File       : {}", context.config_manager.path().display()));
    output::info(format!("  Records    : {}", context.store.root().display()));
    output::info(format!("  Country    : {}", config.default_country));
    output::info(format!("  Currency   : {}", config.default_currency));
    output::info(format!("  Check-in   : {}", config.default_check_in));
    output::info(format!("  Check-out  : {}", config.default_check_out));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let config = &mut context.config;
    match key.to_lowercase().as_str() {
        "country" => config.default_country = value.to_string(),
        "currency" => config.default_currency = value.to_uppercase(),
        "check_in" => config.default_check_in = parse_time(value)?,
        "check_out" => config.default_check_out = parse_time(value)?,
        "store_root" => {
            config.store_root = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}` (expected {})",
                KEYS.join(", ")
            )))
        }
    }
    context.persist_config()?;
    output::success(format!("Config `{key}` updated."));
    if key.eq_ignore_ascii_case("store_root") {
        output::info("The new record location is used the next time the shell starts.");
    } else {
        output::info("New drafts will use the updated defaults.");
    }
    Ok(())
}

fn parse_time(value: &str) -> Result<String, CommandError> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| CommandError::InvalidArguments(format!("invalid time `{value}` (use HH:MM)")))
}
