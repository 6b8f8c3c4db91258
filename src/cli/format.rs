//! Text formatting for amounts, dates, and record rows.

use chrono::NaiveDate;
use subtrack_core::billing::days_until;
use subtrack_domain::SubscriptionRecord;
use uuid::Uuid;

pub const SHORT_ID_LEN: usize = 8;
pub const NOT_AVAILABLE: &str = "N/A";

/// Renders `amount` with the symbol for `currency`, or the code when unknown.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    match code.as_str() {
        "USD" | "CAD" | "AUD" | "NZD" => format!("${amount:.2}"),
        "EUR" => format!("€{amount:.2}"),
        "GBP" => format!("£{amount:.2}"),
        "JPY" => format!("¥{amount:.0}"),
        _ => format!("{code} {amount:.2}"),
    }
}

pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..SHORT_ID_LEN].to_string()
}

/// Relative due text such as `in 5 days` or `3 days overdue`.
pub fn due_label(next_billing_date: NaiveDate, today: NaiveDate) -> String {
    match days_until(next_billing_date, today) {
        0 => "due today".into(),
        1 => "due tomorrow".into(),
        -1 => "1 day overdue".into(),
        days if days < 0 => format!("{} days overdue", -days),
        days => format!("in {days} days"),
    }
}

pub fn record_row(record: &SubscriptionRecord, today: NaiveDate, currency: &str) -> String {
    let mut row = format!(
        "{}  {:<24} {:>10} {:<9} {:<14} {}  {}",
        short_id(record.id),
        record.name,
        format_amount(record.price, currency),
        record.billing_cycle.label(),
        record.category.label(),
        record.next_billing_date,
        due_label(record.next_billing_date, today),
    );
    if !record.is_active {
        row.push_str("  [paused]");
    } else if !record.renews_automatically() {
        row.push_str("  [manual]");
    }
    row
}

pub fn or_not_available(value: Option<impl ToString>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.into())
}
