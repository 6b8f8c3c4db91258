use std::env;

use chrono::{DateTime, NaiveDate, Utc};
use subtrack_core::{Clock, FixedClock};

use crate::errors::CliError;

/// Pins "today" to a `YYYY-MM-DD` date instead of the system clock.
pub const TODAY_ENV: &str = "SUBTRACK_TODAY";

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `SystemClock`, or a `FixedClock` when `SUBTRACK_TODAY` is set.
pub fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let today = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Usage(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"))
            })?;
            Ok(Box::new(FixedClock::new(today)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}
