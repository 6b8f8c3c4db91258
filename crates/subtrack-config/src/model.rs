use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// User preferences for the tracker and its command-line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display currency code; amounts are never converted.
    pub currency: String,
    /// Overrides where the subscription snapshot lives. Defaults to `<base>/data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub seed_sample_data: bool,
    pub upcoming_window_days: i64,
    pub backup_retention: usize,
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            data_dir: None,
            seed_sample_data: true,
            upcoming_window_days: 7,
            backup_retention: 5,
            ui_color_enabled: true,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "currency",
        "data_dir",
        "seed_sample_data",
        "upcoming_window_days",
        "backup_retention",
        "ui_color_enabled",
    ];

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    /// Updates one field from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "currency" => {
                let code = value.to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid(key, "expected a three-letter currency code"));
                }
                self.currency = code;
            }
            "data_dir" => {
                self.data_dir = match value {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "seed_sample_data" => self.seed_sample_data = parse_bool(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, value)?,
            "upcoming_window_days" => {
                let days: i64 = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a whole number of days"))?;
                if days < 0 {
                    return Err(invalid(key, "must not be negative"));
                }
                self.upcoming_window_days = days;
            }
            "backup_retention" => {
                let count: usize = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a positive count"))?;
                if count == 0 {
                    return Err(invalid(key, "must keep at least one backup"));
                }
                self.backup_retention = count;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Textual form of one field, as accepted by [`Config::set_value`].
    pub fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            "currency" => self.currency.clone(),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "default".into()),
            "seed_sample_data" => self.seed_sample_data.to_string(),
            "upcoming_window_days" => self.upcoming_window_days.to_string(),
            "backup_retention" => self.backup_retention.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, "expected true or false")),
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.upcoming_window_days, 7);
        assert!(cfg.seed_sample_data);
    }

    #[test]
    fn set_value_parses_and_validates() {
        let mut cfg = Config::default();
        cfg.set_value("currency", "gbp").unwrap();
        cfg.set_value("ui_color_enabled", "off").unwrap();
        cfg.set_value("backup_retention", "9").unwrap();
        assert_eq!(cfg.currency, "GBP");
        assert!(!cfg.ui_color_enabled);
        assert_eq!(cfg.backup_retention, 9);

        assert!(matches!(
            cfg.set_value("backup_retention", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn every_key_has_a_value() {
        let cfg = Config::default();
        for key in Config::KEYS {
            assert!(cfg.value_of(key).is_some(), "{key}");
        }
        assert_eq!(cfg.value_of("data_dir").as_deref(), Some("default"));
    }

    #[test]
    fn data_dir_defaults_under_base() {
        let mut cfg = Config::default();
        assert_eq!(cfg.resolve_data_dir(Path::new("/base")), PathBuf::from("/base/data"));
        cfg.set_value("data_dir", "/elsewhere").unwrap();
        assert_eq!(cfg.resolve_data_dir(Path::new("/base")), PathBuf::from("/elsewhere"));
    }
}
