use subtrack_config::Config;

use super::CommandDefinition;
use crate::cli::context::ShellContext;
use crate::cli::output;
use crate::errors::{CommandError, CommandResult};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|path|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("show") => {
            show_config(context.config());
            Ok(())
        }
        Some("path") => {
            output::field("Config file", context.config_manager().config_path().display());
            output::field("Snapshot", context.storage().snapshot_path().display());
            output::field("Backups", context.storage().backups_dir().display());
            Ok(())
        }
        Some("set") => {
            let (Some(key), true) = (args.get(1), args.len() >= 3) else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            };
            let key = key.to_lowercase();
            let value = args[2..].join(" ");
            let mut config = context.config().clone();
            config.set_value(&key, &value)?;
            context.update_config(config)?;
            output::success(format!(
                "Set `{key}` to {}.",
                context.config().value_of(&key).unwrap_or_default()
            ));
            if matches!(
                key.as_str(),
                "data_dir" | "backup_retention" | "seed_sample_data"
            ) {
                output::info("The change applies from the next run.");
            }
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`"
        ))),
    }
}

fn show_config(config: &Config) {
    output::section("Configuration");
    for key in Config::KEYS {
        output::field(key, config.value_of(key).unwrap_or_default());
    }
}
