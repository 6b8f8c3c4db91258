use std::collections::HashMap;

pub mod backup;
pub mod config;
pub mod reports;
pub mod subscriptions;
pub mod system;

use crate::cli::context::ShellContext;
use crate::errors::{CommandError, CommandResult};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(subscriptions::definitions());
    commands.extend(reports::definitions());
    commands.extend(backup::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional arguments plus `--flag value` and bare `--switch` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: HashMap<&'a str, &'a str>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// `valued` lists the options that take a value; `switches` the ones that don't.
    pub fn parse(
        args: &[&'a str],
        valued: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if let Some(name) = arg.strip_prefix("--") {
                if valued.contains(&name) {
                    let value = iter.next().ok_or_else(|| {
                        CommandError::InvalidArguments(format!("`--{name}` needs a value"))
                    })?;
                    parsed.options.insert(name, value);
                } else if switches.contains(&name) {
                    parsed.switches.push(name);
                } else {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown option `{arg}`"
                    )));
                }
            } else {
                parsed.positional.push(arg);
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_definition_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names.first(), Some(&"list"));
        assert!(names.contains(&"analytics"));
        assert_eq!(registry.iter().count(), names.len());
    }

    #[test]
    fn parses_options_and_switches() {
        let args = ["net", "--category", "streaming", "--all"];
        let parsed = ParsedArgs::parse(&args, &["category"], &["all"]).unwrap();
        assert_eq!(parsed.positional, vec!["net"]);
        assert_eq!(parsed.option("category"), Some("streaming"));
        assert!(parsed.switch("all"));
    }

    #[test]
    fn rejects_unknown_or_incomplete_options() {
        assert!(ParsedArgs::parse(&["--color"], &[], &[]).is_err());
        assert!(ParsedArgs::parse(&["--notes"], &["notes"], &[]).is_err());
    }
}
