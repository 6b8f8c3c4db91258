pub mod commands;
pub mod context;
pub mod format;
mod help;
pub mod output;
mod shell;
pub mod system_clock;

pub use context::{CliMode, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
