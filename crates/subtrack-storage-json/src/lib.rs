use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use subtrack_core::{storage::RecordStorage, CoreError};
use subtrack_domain::SubscriptionRecord;

pub const SCHEMA_VERSION: u32 = 1;
pub const SNAPSHOT_FILE: &str = "subscriptions.json";

const SNAPSHOT_STEM: &str = "subscriptions";
const BACKUP_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for the subscription set and its backups.
#[derive(Debug, Clone)]
pub struct JsonRecordStorage {
    snapshot_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// On-disk envelope around the record list.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    schema_version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    records: Vec<SubscriptionRecord>,
}

/// Files written before the envelope existed held a bare record array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFile {
    Snapshot(Snapshot),
    Legacy(Vec<SubscriptionRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
}

impl JsonRecordStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(data_dir: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let backups_dir = data_dir.join(BACKUP_DIR);
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            snapshot_path: data_dir.join(SNAPSHOT_FILE),
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backups newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                id: file_name.to_string(),
                created_at: parse_backup_timestamp(file_name),
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by_cached_key(|entry| {
            Reverse((entry.created_at, backup_sequence(&entry.id), entry.id.clone()))
        });
        Ok(entries)
    }

    /// Copies `backup` over the live snapshot and returns its records.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<Vec<SubscriptionRecord>, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let records = read_snapshot(&backup.path)?;
        // Stage first: backing up the live file may overwrite or prune `backup`.
        let tmp = tmp_path(&self.snapshot_path);
        fs::copy(&backup.path, &tmp)?;
        self.backup_existing_file()?;
        fs::rename(&tmp, &self.snapshot_path)?;
        tracing::info!(backup = %backup.id, count = records.len(), "restored subscriptions from backup");
        Ok(records)
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        if !self.snapshot_path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let path = self.next_backup_path(&timestamp);
        fs::copy(&self.snapshot_path, &path)?;
        tracing::debug!(backup = %path.display(), "backed up subscriptions snapshot");
        self.prune_backups()
    }

    /// Several saves can land in the same second; later ones get `_1`, `_2`, ...
    fn next_backup_path(&self, timestamp: &str) -> PathBuf {
        let mut sequence = 0;
        loop {
            let path = self.backups_dir.join(backup_file_name(timestamp, sequence));
            if !path.exists() {
                return path;
            }
            sequence += 1;
        }
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                tracing::warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl RecordStorage for JsonRecordStorage {
    fn load(&self) -> Result<Option<Vec<SubscriptionRecord>>, CoreError> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        read_snapshot(&self.snapshot_path).map(Some)
    }

    fn save(&self, records: &[SubscriptionRecord]) -> Result<(), CoreError> {
        self.backup_existing_file()?;
        let snapshot = Snapshot {
            schema_version: SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
            records: records.to_vec(),
        };
        let data =
            serde_json::to_string_pretty(&snapshot).map_err(|err| CoreError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.snapshot_path);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &self.snapshot_path)?;
        tracing::debug!(count = records.len(), path = %self.snapshot_path.display(), "saved subscriptions");
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<SubscriptionRecord>, CoreError> {
    let data = fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if let Some(version) = value.get("schema_version").and_then(|v| v.as_u64()) {
        if version > u64::from(SCHEMA_VERSION) {
            return Err(CoreError::Storage(format!(
                "snapshot schema version {version} is newer than supported version {SCHEMA_VERSION}"
            )));
        }
    }
    let stored: StoredFile =
        serde_json::from_value(value).map_err(|err| CoreError::Serde(err.to_string()))?;
    Ok(match stored {
        StoredFile::Snapshot(snapshot) => snapshot.records,
        StoredFile::Legacy(records) => records,
    })
}

fn backup_file_name(timestamp: &str, sequence: u32) -> String {
    match sequence {
        0 => format!("{SNAPSHOT_STEM}_{timestamp}.{BACKUP_EXTENSION}"),
        n => format!("{SNAPSHOT_STEM}_{timestamp}_{n}.{BACKUP_EXTENSION}"),
    }
}

/// Splits `stem_YYYYmmdd_HHMMSS[_N].json` into its timestamp and sequence.
fn parse_backup_name(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let segments: Vec<&str> = trimmed.rsplit('_').take(3).collect();
    let (date, time, sequence) = match segments.as_slice() {
        [time, date, ..] if is_digits(date, 8) && is_digits(time, 6) => (*date, *time, 0),
        [sequence, time, date] if is_digits(date, 8) && is_digits(time, 6) => {
            (*date, *time, sequence.parse().ok()?)
        }
        _ => return None,
    };
    let created_at = NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()?
        .and_utc();
    Some((created_at, sequence))
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    parse_backup_name(name).map(|(created_at, _)| created_at)
}

fn backup_sequence(name: &str) -> u32 {
    parse_backup_name(name).map_or(0, |(_, sequence)| sequence)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
