//! Keeps `next_billing_date` current for active, auto-renewing records.

use chrono::NaiveDate;
use uuid::Uuid;

use subtrack_domain::{SubscriptionRecord, TimeInterval, TimeUnit};

use crate::billing::is_overdue;

/// Advances overdue records through every elapsed renewal cycle.
pub struct RenewalService;

impl RenewalService {
    /// Returns the first renewal date on or after `today`, or `None` when the
    /// record is inactive, does not auto-renew, or is not overdue.
    pub fn caught_up_date(record: &SubscriptionRecord, today: NaiveDate) -> Option<NaiveDate> {
        if !record.is_active || !is_overdue(record.next_billing_date, today) {
            return None;
        }
        let interval = record.repetition_type.interval()?;
        let anchor = record.next_billing_date;
        let mut steps = minimum_steps(&interval, anchor, today);
        loop {
            let candidate = interval.add_to(anchor, steps)?;
            if candidate >= today {
                return Some(candidate);
            }
            steps = steps.checked_add(1)?;
        }
    }

    /// Advances a single record in place, returning whether it changed.
    pub fn advance(record: &mut SubscriptionRecord, today: NaiveDate) -> bool {
        match Self::caught_up_date(record, today) {
            Some(next) => {
                tracing::debug!(
                    id = %record.id,
                    from = %record.next_billing_date,
                    to = %next,
                    "advanced next billing date"
                );
                record.next_billing_date = next;
                true
            }
            None => false,
        }
    }

    /// Runs one renewal pass and returns the ids that were advanced.
    pub fn advance_all(records: &mut [SubscriptionRecord], today: NaiveDate) -> Vec<Uuid> {
        records
            .iter_mut()
            .filter_map(|record| Self::advance(record, today).then_some(record.id))
            .collect()
    }
}

/// Lower bound on the steps needed to reach `today`. A month spans at most 31
/// days and a year at most 366, so fewer steps cannot get there.
fn minimum_steps(interval: &TimeInterval, anchor: NaiveDate, today: NaiveDate) -> u32 {
    let overdue_days = (today - anchor).num_days().max(0);
    let max_days_per_step = match interval.unit {
        TimeUnit::Week => 7,
        TimeUnit::Month => 31,
        TimeUnit::Year => 366,
    } * i64::from(interval.every.max(1));
    let steps = overdue_days / max_days_per_step;
    u32::try_from(steps).unwrap_or(u32::MAX).max(1)
}
