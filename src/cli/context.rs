use std::path::PathBuf;

use chrono::NaiveDate;
use strsim::levenshtein;
use subtrack_config::{resolve_base_dir, Config, ConfigManager};
use subtrack_core::{Clock, CoreError, RecordStore, StoreOptions};
use subtrack_domain::SubscriptionRecord;
use subtrack_storage_json::JsonRecordStorage;
use uuid::Uuid;

use crate::cli::commands::{all_definitions, CommandDefinition, CommandRegistry};
use crate::cli::output;
use crate::cli::system_clock::clock_from_env;
use crate::errors::{CliError, CommandError, CommandResult};

const MIN_ID_PREFIX: usize = 4;
const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    /// One command taken from the process arguments.
    Single,
    /// Commands read line by line from stdin.
    Script,
}

/// Everything a command handler can reach: the record store, its backing
/// storage, configuration, and the clock.
pub struct ShellContext {
    mode: CliMode,
    store: RecordStore,
    storage: JsonRecordStorage,
    config: Config,
    config_manager: ConfigManager,
    clock: Box<dyn Clock>,
    pub(crate) registry: CommandRegistry,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, resolve_base_dir(), clock_from_env()?)
    }

    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let data_dir = config_manager.data_dir(&config);
        let storage = JsonRecordStorage::with_retention(data_dir, config.backup_retention)?;
        let mut store = RecordStore::new(
            Box::new(storage.clone()),
            StoreOptions {
                seed_sample_data: config.seed_sample_data,
            },
        );
        let count = store.load(clock.today());
        tracing::debug!(count, path = %storage.snapshot_path().display(), "subscription store ready");

        Ok(Self {
            mode,
            store,
            storage,
            config,
            config_manager,
            clock,
            registry: CommandRegistry::new(all_definitions()),
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    pub fn storage(&self) -> &JsonRecordStorage {
        &self.storage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// Saves `config` and applies the settings that take effect immediately.
    pub(crate) fn update_config(&mut self, config: Config) -> CommandResult {
        self.config_manager.save(&config)?;
        output::set_color_enabled(config.ui_color_enabled);
        self.config = config;
        Ok(())
    }

    /// Re-reads the snapshot after it was replaced on disk.
    pub(crate) fn reload(&mut self) -> usize {
        let today = self.today();
        self.store.load(today)
    }

    pub(crate) fn dispatch(&mut self, tokens: &[String]) -> CommandResult {
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(());
        };
        let name = raw.to_lowercase();
        let Some(handler) = self.registry.get(&name).map(|command| command.handler) else {
            return Err(CommandError::UnknownCommand(raw.clone()));
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        tracing::debug!(command = %name, args = args.len(), "dispatching command");
        handler(self, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        let input = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= MAX_SUGGESTION_DISTANCE {
                output::info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::UnknownCommand(ref input) => {
                output::error(&err);
                self.suggest_command(input);
            }
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    /// Warns when the last write to disk failed. The change still stands in memory.
    pub(crate) fn report_persistence(&self) {
        if let Some(message) = self.store.last_persistence_error() {
            output::warning(format!("Changes could not be saved: {message}"));
        }
    }

    /// Resolves a full id, a unique id prefix, or a unique exact name.
    pub(crate) fn resolve_id(&self, needle: &str) -> Result<Uuid, CommandError> {
        let needle = needle.trim();
        if let Ok(id) = Uuid::parse_str(needle) {
            return match self.store.get(id) {
                Some(_) => Ok(id),
                None => Err(CoreError::RecordNotFound(id).into()),
            };
        }

        let records = self.store.records();
        let prefix = needle.replace('-', "").to_lowercase();
        if prefix.len() >= MIN_ID_PREFIX {
            let by_prefix: Vec<&SubscriptionRecord> = records
                .iter()
                .filter(|record| record.id.simple().to_string().starts_with(&prefix))
                .collect();
            if let Some(id) = unique(needle, &by_prefix)? {
                return Ok(id);
            }
        }

        let by_name: Vec<&SubscriptionRecord> = records
            .iter()
            .filter(|record| record.name.eq_ignore_ascii_case(needle))
            .collect();
        unique(needle, &by_name)?.ok_or_else(|| CommandError::NoMatch(needle.to_string()))
    }
}

fn unique(needle: &str, matches: &[&SubscriptionRecord]) -> Result<Option<Uuid>, CommandError> {
    match matches {
        [] => Ok(None),
        [only] => Ok(Some(only.id)),
        many => Err(CommandError::InvalidArguments(format!(
            "`{needle}` matches {} subscriptions; use a longer id",
            many.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtrack_core::FixedClock;
    use tempfile::tempdir;

    fn context(dir: &std::path::Path) -> ShellContext {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 4, 14).unwrap());
        ShellContext::with_base_dir(CliMode::Script, dir.to_path_buf(), Box::new(clock)).unwrap()
    }

    #[test]
    fn first_run_seeds_samples() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        assert_eq!(ctx.store().len(), 3);
        assert!(ctx.storage().snapshot_path().exists());
    }

    #[test]
    fn resolves_ids_by_prefix_and_name() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        let netflix = ctx
            .store()
            .records()
            .iter()
            .find(|record| record.name == "Netflix")
            .unwrap()
            .id;

        assert_eq!(ctx.resolve_id(&netflix.to_string()).unwrap(), netflix);
        assert_eq!(ctx.resolve_id(&netflix.simple().to_string()[..8]).unwrap(), netflix);
        assert_eq!(ctx.resolve_id("netflix").unwrap(), netflix);
        assert!(matches!(
            ctx.resolve_id("Hulu"),
            Err(CommandError::NoMatch(_))
        ));
        assert!(matches!(
            ctx.resolve_id(&Uuid::new_v4().to_string()),
            Err(CommandError::Core(CoreError::RecordNotFound(_)))
        ));
    }

    #[test]
    fn unknown_commands_are_reported() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path());
        let err = ctx.dispatch(&["lsit".to_string()]).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(_)));
    }
}
