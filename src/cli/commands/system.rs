use super::CommandDefinition;
use crate::cli::context::ShellContext;
use crate::cli::help;
use crate::cli::output;
use crate::errors::{CommandError, CommandResult};
use crate::utils::build_info;
use subtrack_storage_json::SCHEMA_VERSION;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Stop reading the script", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Subtrack {}", meta.version));
    output::field("Snapshot schema", format!("v{SCHEMA_VERSION}"));
    output::field(
        "Build hash",
        format!("{} ({})", meta.git_hash, meta.git_status),
    );
    output::field("Built at", meta.timestamp);
    output::field("Target", meta.target);
    output::field("Profile", meta.profile);
    output::field("Rustc", meta.rustc);
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        return match context.command(&name.to_lowercase()) {
            Some(command) => {
                help::print_command(command);
                Ok(())
            }
            None => Err(CommandError::UnknownCommand(name.to_string())),
        };
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
