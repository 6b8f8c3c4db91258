//! Shared traits, cadences, and calendar stepping for subscription records.

use std::fmt;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities held by the record store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Nominal period a subscription's listed price covers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    pub const ALL: [BillingCycle; 4] = [
        BillingCycle::Weekly,
        BillingCycle::Monthly,
        BillingCycle::Quarterly,
        BillingCycle::Yearly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Yearly => "Yearly",
        }
    }

    /// Parses a case-insensitive cycle name such as `monthly`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cycle| cycle.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Auto-renewal cadence used to advance a record's next billing date.
///
/// Independent from [`BillingCycle`]: a record can be priced monthly while
/// renewing yearly, or not auto-renew at all.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepetitionType {
    Disabled,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl RepetitionType {
    pub const ALL: [RepetitionType; 5] = [
        RepetitionType::Disabled,
        RepetitionType::Weekly,
        RepetitionType::Monthly,
        RepetitionType::Quarterly,
        RepetitionType::Yearly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RepetitionType::Disabled => "Disabled",
            RepetitionType::Weekly => "Weekly",
            RepetitionType::Monthly => "Monthly",
            RepetitionType::Quarterly => "Quarterly",
            RepetitionType::Yearly => "Yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(value.trim()))
    }

    pub fn is_enabled(self) -> bool {
        self != RepetitionType::Disabled
    }

    /// Calendar step applied per renewal, or `None` when renewal is disabled.
    pub fn interval(self) -> Option<TimeInterval> {
        let (every, unit) = match self {
            RepetitionType::Disabled => return None,
            RepetitionType::Weekly => (1, TimeUnit::Week),
            RepetitionType::Monthly => (1, TimeUnit::Month),
            RepetitionType::Quarterly => (3, TimeUnit::Month),
            RepetitionType::Yearly => (1, TimeUnit::Year),
        };
        Some(TimeInterval { every, unit })
    }
}

impl From<BillingCycle> for RepetitionType {
    fn from(cycle: BillingCycle) -> Self {
        match cycle {
            BillingCycle::Weekly => RepetitionType::Weekly,
            BillingCycle::Monthly => RepetitionType::Monthly,
            BillingCycle::Quarterly => RepetitionType::Quarterly,
            BillingCycle::Yearly => RepetitionType::Yearly,
        }
    }
}

impl fmt::Display for RepetitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reporting period selected for analytics totals and category breakdowns.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    #[default]
    Month,
    Year,
}

impl AnalyticsPeriod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" => Some(AnalyticsPeriod::Month),
            "year" | "yearly" => Some(AnalyticsPeriod::Year),
            _ => None,
        }
    }
}

impl fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalyticsPeriod::Month => "Month",
            AnalyticsPeriod::Year => "Year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeUnit {
    Week,
    Month,
    Year,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

/// A time unit and multiplier used to step billing dates forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    /// Date one interval after `from`. Month and year steps clamp to the last
    /// day of the target month. Returns `None` past the supported calendar range.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.add_to(from, 1)
    }

    /// Date `steps` intervals after `anchor`, computed in one jump so that
    /// clamping on a short month does not carry into later steps of the same
    /// call. A clamped result that is stored and later used as the anchor keeps
    /// the shorter day (Jan 31 -> Feb 28, then Feb 28 -> Mar 28).
    pub fn add_to(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let count = self.every.checked_mul(steps)?;
        match self.unit {
            TimeUnit::Week => anchor.checked_add_days(Days::new(u64::from(count) * 7)),
            TimeUnit::Month => anchor.checked_add_months(Months::new(count)),
            TimeUnit::Year => anchor.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }

    pub fn label(&self) -> String {
        match (self.every, self.unit) {
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (3, TimeUnit::Month) => "Quarterly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}{}", n, unit, if n > 1 { "s" } else { "" }),
        }
    }
}
