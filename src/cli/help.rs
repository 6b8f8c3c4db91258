use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::output;

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for command in registry.iter() {
        output::info(format!("  {:<12} {}", command.name, command.description));
    }
    output::info("Use `help <command>` for details.");
}

pub fn print_command(command: &CommandDefinition) {
    output::section(format!("Help: {}", command.name));
    output::info(format!("  Description: {}", command.description));
    output::info(format!("  Usage: {}", command.usage));
}
