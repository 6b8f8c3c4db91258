//! Pure conversions between a record's listed price and normalized amounts.

use chrono::NaiveDate;
use subtrack_domain::{BillingCycle, SubscriptionRecord};

const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Normalizes `price` for `cycle` to a monthly figure.
pub fn monthly_amount(price: f64, cycle: BillingCycle) -> f64 {
    match cycle {
        BillingCycle::Weekly => price * WEEKS_PER_YEAR / MONTHS_PER_YEAR,
        BillingCycle::Monthly => price,
        BillingCycle::Quarterly => price / 3.0,
        BillingCycle::Yearly => price / MONTHS_PER_YEAR,
    }
}

/// Normalizes `price` for `cycle` to a yearly figure.
pub fn yearly_amount(price: f64, cycle: BillingCycle) -> f64 {
    match cycle {
        BillingCycle::Weekly => price * WEEKS_PER_YEAR,
        BillingCycle::Monthly => price * MONTHS_PER_YEAR,
        BillingCycle::Quarterly => price * 4.0,
        BillingCycle::Yearly => price,
    }
}

/// Whole calendar days from `today` until `next_billing_date`; negative when overdue.
pub fn days_until(next_billing_date: NaiveDate, today: NaiveDate) -> i64 {
    (next_billing_date - today).num_days()
}

/// Strictly before `today`. A charge due today is not overdue.
pub fn is_overdue(next_billing_date: NaiveDate, today: NaiveDate) -> bool {
    next_billing_date < today
}

pub fn record_monthly_amount(record: &SubscriptionRecord) -> f64 {
    monthly_amount(record.price, record.billing_cycle)
}

pub fn record_yearly_amount(record: &SubscriptionRecord) -> f64 {
    yearly_amount(record.price, record.billing_cycle)
}
