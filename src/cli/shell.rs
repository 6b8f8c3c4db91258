use std::{
    env,
    io::{self, BufRead},
};

use shell_words::split;

use crate::cli::context::{CliMode, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::errors::{CliError, CommandError};

/// When set and no arguments are given, commands are read from stdin.
pub const SCRIPT_ENV: &str = "SUBTRACK_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mode = if args.is_empty() && env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Single
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Single => run_single(&mut context, &args),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_single(context: &mut ShellContext, args: &[String]) -> Result<(), CliError> {
    if args.is_empty() {
        help::print_overview(&context.registry);
        return Ok(());
    }
    match context.dispatch(args) {
        Ok(()) | Err(CommandError::ExitRequested) => Ok(()),
        Err(err) => {
            if let CommandError::UnknownCommand(input) = &err {
                context.suggest_command(input);
            }
            Err(err.into())
        }
    }
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens = match split(trimmed) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(format!("Could not parse `{trimmed}`: {err}"));
                continue;
            }
        };
        match context.dispatch(&tokens) {
            Ok(()) => {}
            Err(CommandError::ExitRequested) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}
