use super::CommandDefinition;
use crate::cli::context::ShellContext;
use crate::cli::output;
use crate::errors::{CommandError, CommandResult};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "backup",
        "List or restore snapshot backups",
        "backup [list|restore <number|file>]",
        cmd_backup,
    )]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("list") => list_backups(context),
        Some("restore") => {
            let target = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: backup restore <number|file>".into())
            })?;
            restore_backup(context, target)
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown backup subcommand `{other}`"
        ))),
    }
}

fn list_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.storage().list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    for (index, backup) in backups.iter().enumerate() {
        output::info(format!(
            "  {:>2}. {}  ({} bytes)",
            index + 1,
            backup.id,
            backup.size_bytes
        ));
    }
    Ok(())
}

fn restore_backup(context: &mut ShellContext, target: &str) -> CommandResult {
    let mut backups = context.storage().list_backups()?;
    let position = match target.parse::<usize>() {
        Ok(number) if (1..=backups.len()).contains(&number) => Some(number - 1),
        _ => backups.iter().position(|backup| backup.id == target),
    };
    let Some(position) = position else {
        return Err(CommandError::InvalidArguments(format!(
            "no backup `{target}`; see `backup list`"
        )));
    };
    let backup = backups.swap_remove(position);
    context.storage().restore_backup(&backup)?;
    let count = context.reload();
    output::success(format!(
        "Restored {count} subscription(s) from `{}`.",
        backup.id
    ));
    context.report_persistence();
    Ok(())
}
