//! First-run example records.

use chrono::{Duration, NaiveDate};

use subtrack_domain::{BillingCycle, RepetitionType, SubscriptionCategory, SubscriptionRecord};

/// Three sample subscriptions dated relative to `today`:
///
/// | Name | Price | Category | Due | Renews |
/// |---|---|---|---|---|
/// | Netflix | 15.99 monthly | Streaming | today + 5 | monthly |
/// | Spotify | 9.99 monthly | Music | today + 12 | monthly |
/// | Adobe Creative Cloud | 52.99 monthly | Productivity | today + 3 | yearly |
pub fn sample_records(today: NaiveDate) -> Vec<SubscriptionRecord> {
    vec![
        SubscriptionRecord::new(
            "Netflix",
            15.99,
            BillingCycle::Monthly,
            SubscriptionCategory::Streaming,
            today + Duration::days(5),
        )
        .with_color("red"),
        SubscriptionRecord::new(
            "Spotify",
            9.99,
            BillingCycle::Monthly,
            SubscriptionCategory::Music,
            today + Duration::days(12),
        )
        .with_color("green"),
        SubscriptionRecord::new(
            "Adobe Creative Cloud",
            52.99,
            BillingCycle::Monthly,
            SubscriptionCategory::Productivity,
            today + Duration::days(3),
        )
        .with_color("purple")
        .with_repetition(RepetitionType::Yearly),
    ]
}
