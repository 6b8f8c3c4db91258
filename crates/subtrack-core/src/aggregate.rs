//! Derived views over the active record set.
//!
//! Every function here is recomputed on demand from the slice it is given and
//! never mutates it. Only records with `is_active == true` participate.

use chrono::{Days, NaiveDate};

use subtrack_domain::{AnalyticsPeriod, BillingCycle, SubscriptionCategory, SubscriptionRecord};

use crate::billing::{days_until, is_overdue, record_monthly_amount, record_yearly_amount};

/// Days ahead of today that count as "upcoming".
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Monthly or yearly spend attributed to one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySpending {
    pub category: SubscriptionCategory,
    pub amount: f64,
    pub count: usize,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub reference_date: NaiveDate,
    pub active_count: usize,
    pub upcoming_count: usize,
    pub overdue_count: usize,
    pub total_monthly: f64,
    pub total_yearly: f64,
}

/// Analytics for a selected period. `None` fields mean there is no active data.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub period: AnalyticsPeriod,
    pub total: f64,
    pub active_count: usize,
    pub average_monthly: f64,
    pub most_expensive: Option<String>,
    pub cheapest: Option<String>,
    pub most_common_cycle: Option<BillingCycle>,
    pub most_common_category: Option<SubscriptionCategory>,
    pub breakdown: Vec<CategorySpending>,
}

pub struct AggregateService;

impl AggregateService {
    pub fn active(records: &[SubscriptionRecord]) -> Vec<&SubscriptionRecord> {
        active_iter(records).collect()
    }

    pub fn overdue(records: &[SubscriptionRecord], today: NaiveDate) -> Vec<&SubscriptionRecord> {
        active_iter(records)
            .filter(|record| is_overdue(record.next_billing_date, today))
            .collect()
    }

    /// Due within the next seven days and not overdue, soonest first.
    /// Equal dates keep collection order.
    pub fn upcoming(records: &[SubscriptionRecord], today: NaiveDate) -> Vec<&SubscriptionRecord> {
        Self::upcoming_within(records, today, UPCOMING_WINDOW_DAYS)
    }

    pub fn upcoming_within(
        records: &[SubscriptionRecord],
        today: NaiveDate,
        window_days: i64,
    ) -> Vec<&SubscriptionRecord> {
        let mut upcoming: Vec<_> = active_iter(records)
            .filter(|record| {
                days_until(record.next_billing_date, today) <= window_days
                    && !is_overdue(record.next_billing_date, today)
            })
            .collect();
        upcoming.sort_by_key(|record| record.next_billing_date);
        upcoming
    }

    /// Active records billing between `today` and `today + days`, inclusive.
    /// A horizon past the calendar's end is clamped to `NaiveDate::MAX`.
    pub fn renewals_within(
        records: &[SubscriptionRecord],
        today: NaiveDate,
        days: i64,
    ) -> Vec<&SubscriptionRecord> {
        let Ok(days) = u64::try_from(days) else {
            return Vec::new();
        };
        let horizon = today
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        active_iter(records)
            .filter(|record| record.next_billing_date >= today && record.next_billing_date <= horizon)
            .collect()
    }

    pub fn auto_renewing(records: &[SubscriptionRecord]) -> Vec<&SubscriptionRecord> {
        active_iter(records)
            .filter(|record| record.renews_automatically())
            .collect()
    }

    pub fn without_auto_renewal(records: &[SubscriptionRecord]) -> Vec<&SubscriptionRecord> {
        active_iter(records)
            .filter(|record| !record.renews_automatically())
            .collect()
    }

    pub fn total_monthly(records: &[SubscriptionRecord]) -> f64 {
        active_iter(records).map(record_monthly_amount).sum()
    }

    pub fn total_yearly(records: &[SubscriptionRecord]) -> f64 {
        active_iter(records).map(record_yearly_amount).sum()
    }

    pub fn total_for_period(records: &[SubscriptionRecord], period: AnalyticsPeriod) -> f64 {
        match period {
            AnalyticsPeriod::Month => Self::total_monthly(records),
            AnalyticsPeriod::Year => Self::total_yearly(records),
        }
    }

    /// `total_monthly` divided by the active count, or by one when there are none.
    pub fn average_monthly(records: &[SubscriptionRecord]) -> f64 {
        let count = active_iter(records).count().max(1);
        Self::total_monthly(records) / count as f64
    }

    pub fn for_category(
        records: &[SubscriptionRecord],
        category: SubscriptionCategory,
    ) -> Vec<&SubscriptionRecord> {
        active_iter(records)
            .filter(|record| record.category == category)
            .collect()
    }

    pub fn count_for_category(records: &[SubscriptionRecord], category: SubscriptionCategory) -> usize {
        active_iter(records)
            .filter(|record| record.category == category)
            .count()
    }

    pub fn monthly_spending_for(
        records: &[SubscriptionRecord],
        category: SubscriptionCategory,
    ) -> f64 {
        active_iter(records)
            .filter(|record| record.category == category)
            .map(record_monthly_amount)
            .sum()
    }

    /// Twelve times the category's monthly figure, not the sum of yearly
    /// amounts. Rounding can make it differ from `total_yearly`.
    pub fn yearly_spending_for(
        records: &[SubscriptionRecord],
        category: SubscriptionCategory,
    ) -> f64 {
        Self::monthly_spending_for(records, category) * 12.0
    }

    /// Categories with a positive amount for `period`, largest first.
    pub fn category_breakdown(
        records: &[SubscriptionRecord],
        period: AnalyticsPeriod,
    ) -> Vec<CategorySpending> {
        let mut rows: Vec<CategorySpending> = SubscriptionCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let amount = match period {
                    AnalyticsPeriod::Month => Self::monthly_spending_for(records, category),
                    AnalyticsPeriod::Year => Self::yearly_spending_for(records, category),
                };
                (amount > 0.0).then(|| CategorySpending {
                    category,
                    amount,
                    count: Self::count_for_category(records, category),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        rows
    }

    /// Highest monthly amount; the first one seen wins a tie.
    pub fn most_expensive(records: &[SubscriptionRecord]) -> Option<&SubscriptionRecord> {
        active_iter(records).fold(None, |best, record| match best {
            Some(current) if record_monthly_amount(record) <= record_monthly_amount(current) => {
                Some(current)
            }
            _ => Some(record),
        })
    }

    /// Lowest monthly amount; the first one seen wins a tie.
    pub fn cheapest(records: &[SubscriptionRecord]) -> Option<&SubscriptionRecord> {
        active_iter(records).fold(None, |best, record| match best {
            Some(current) if record_monthly_amount(record) >= record_monthly_amount(current) => {
                Some(current)
            }
            _ => Some(record),
        })
    }

    /// Mode of the billing cycle. Ties go to the value encountered first.
    pub fn most_common_cycle(records: &[SubscriptionRecord]) -> Option<BillingCycle> {
        mode(active_iter(records).map(|record| record.billing_cycle))
    }

    /// Mode of the category. Ties go to the value encountered first.
    pub fn most_common_category(records: &[SubscriptionRecord]) -> Option<SubscriptionCategory> {
        mode(active_iter(records).map(|record| record.category))
    }

    /// Case-insensitive name match over active records, optionally narrowed to
    /// one category, sorted by name. An empty query matches everything.
    pub fn search<'a>(
        records: &'a [SubscriptionRecord],
        query: &str,
        category: Option<SubscriptionCategory>,
    ) -> Vec<&'a SubscriptionRecord> {
        Self::search_with(records, query, category, false)
    }

    /// [`Self::search`], optionally including paused records.
    pub fn search_with<'a>(
        records: &'a [SubscriptionRecord],
        query: &str,
        category: Option<SubscriptionCategory>,
        include_inactive: bool,
    ) -> Vec<&'a SubscriptionRecord> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<_> = records
            .iter()
            .filter(|record| include_inactive || record.is_active)
            .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
            .filter(|record| category.map_or(true, |wanted| record.category == wanted))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    pub fn dashboard(records: &[SubscriptionRecord], today: NaiveDate) -> DashboardSummary {
        DashboardSummary {
            reference_date: today,
            active_count: active_iter(records).count(),
            upcoming_count: Self::upcoming(records, today).len(),
            overdue_count: Self::overdue(records, today).len(),
            total_monthly: Self::total_monthly(records),
            total_yearly: Self::total_yearly(records),
        }
    }

    pub fn analytics(records: &[SubscriptionRecord], period: AnalyticsPeriod) -> AnalyticsReport {
        AnalyticsReport {
            period,
            total: Self::total_for_period(records, period),
            active_count: active_iter(records).count(),
            average_monthly: Self::average_monthly(records),
            most_expensive: Self::most_expensive(records).map(|record| record.name.clone()),
            cheapest: Self::cheapest(records).map(|record| record.name.clone()),
            most_common_cycle: Self::most_common_cycle(records),
            most_common_category: Self::most_common_category(records),
            breakdown: Self::category_breakdown(records, period),
        }
    }
}

fn active_iter(records: &[SubscriptionRecord]) -> impl Iterator<Item = &SubscriptionRecord> {
    records.iter().filter(|record| record.is_active)
}

fn mode<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(T, usize)>, (value, count)| match best {
            Some((_, top)) if count <= top => best,
            _ => Some((value, count)),
        })
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtrack_domain::RepetitionType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        name: &str,
        price: f64,
        cycle: BillingCycle,
        category: SubscriptionCategory,
        next: NaiveDate,
    ) -> SubscriptionRecord {
        SubscriptionRecord::new(name, price, cycle, category, next)
    }

    fn today() -> NaiveDate {
        date(2025, 3, 10)
    }

    fn fixture() -> Vec<SubscriptionRecord> {
        vec![
            record("Netflix", 15.99, BillingCycle::Monthly, SubscriptionCategory::Streaming, date(2025, 3, 15)),
            record("Spotify", 9.99, BillingCycle::Monthly, SubscriptionCategory::Music, date(2025, 3, 22)),
            record("Gym", 10.0, BillingCycle::Weekly, SubscriptionCategory::Fitness, date(2025, 3, 8)),
            record("iCloud", 36.0, BillingCycle::Yearly, SubscriptionCategory::Cloud, date(2025, 3, 12)),
            record("Hulu", 7.99, BillingCycle::Monthly, SubscriptionCategory::Streaming, date(2025, 3, 1)).inactive(),
        ]
    }

    #[test]
    fn inactive_records_are_excluded_everywhere() {
        let records = fixture();
        assert_eq!(AggregateService::active(&records).len(), 4);
        assert!(AggregateService::overdue(&records, today())
            .iter()
            .all(|r| r.name != "Hulu"));
        assert_eq!(AggregateService::count_for_category(&records, SubscriptionCategory::Streaming), 1);
    }

    #[test]
    fn upcoming_is_sorted_and_disjoint_from_overdue() {
        let records = fixture();
        let upcoming = AggregateService::upcoming(&records, today());
        let names: Vec<_> = upcoming.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["iCloud", "Netflix"]);

        let overdue = AggregateService::overdue(&records, today());
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].name, "Gym");
        assert!(upcoming.iter().all(|u| overdue.iter().all(|o| o.id != u.id)));
    }

    #[test]
    fn upcoming_ties_keep_collection_order() {
        let due = date(2025, 3, 12);
        let records = vec![
            record("B", 1.0, BillingCycle::Monthly, SubscriptionCategory::Other, due),
            record("A", 1.0, BillingCycle::Monthly, SubscriptionCategory::Other, due),
        ];
        let names: Vec<_> = AggregateService::upcoming(&records, today())
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn totals_match_sum_of_normalized_amounts() {
        let records = fixture();
        let expected = 15.99 + 9.99 + 10.0 * 52.0 / 12.0 + 3.0;
        assert!((AggregateService::total_monthly(&records) - expected).abs() < 1e-9);
        let yearly = 15.99 * 12.0 + 9.99 * 12.0 + 520.0 + 36.0;
        assert!((AggregateService::total_yearly(&records) - yearly).abs() < 1e-9);
    }

    #[test]
    fn category_yearly_is_twelve_times_monthly() {
        let records = fixture();
        let monthly = AggregateService::monthly_spending_for(&records, SubscriptionCategory::Fitness);
        let yearly = AggregateService::yearly_spending_for(&records, SubscriptionCategory::Fitness);
        assert!((yearly - monthly * 12.0).abs() < 1e-9);
        assert!((yearly - 520.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_skips_empty_categories_and_sorts_descending() {
        let records = fixture();
        let rows = AggregateService::category_breakdown(&records, AnalyticsPeriod::Month);
        let categories: Vec<_> = rows.iter().map(|row| row.category).collect();
        assert_eq!(
            categories,
            vec![
                SubscriptionCategory::Fitness,
                SubscriptionCategory::Streaming,
                SubscriptionCategory::Music,
                SubscriptionCategory::Cloud,
            ]
        );
        let yearly = AggregateService::category_breakdown(&records, AnalyticsPeriod::Year);
        assert!((yearly[1].amount - 15.99 * 12.0).abs() < 1e-9);
    }

    #[test]
    fn extremes_use_monthly_amount() {
        let records = fixture();
        assert_eq!(AggregateService::most_expensive(&records).map(|r| r.name.as_str()), Some("Gym"));
        assert_eq!(AggregateService::cheapest(&records).map(|r| r.name.as_str()), Some("iCloud"));
    }

    #[test]
    fn extremes_prefer_first_on_tie() {
        let due = date(2025, 4, 1);
        let records = vec![
            record("First", 12.0, BillingCycle::Monthly, SubscriptionCategory::Other, due),
            record("Second", 144.0, BillingCycle::Yearly, SubscriptionCategory::Other, due),
        ];
        assert_eq!(AggregateService::most_expensive(&records).unwrap().name, "First");
        assert_eq!(AggregateService::cheapest(&records).unwrap().name, "First");
    }

    #[test]
    fn mode_tie_goes_to_first_encountered() {
        let due = date(2025, 4, 1);
        let records = vec![
            record("a", 1.0, BillingCycle::Yearly, SubscriptionCategory::News, due),
            record("b", 1.0, BillingCycle::Monthly, SubscriptionCategory::Gaming, due),
            record("c", 1.0, BillingCycle::Monthly, SubscriptionCategory::News, due),
            record("d", 1.0, BillingCycle::Yearly, SubscriptionCategory::Gaming, due),
        ];
        assert_eq!(AggregateService::most_common_cycle(&records), Some(BillingCycle::Yearly));
        assert_eq!(
            AggregateService::most_common_category(&records),
            Some(SubscriptionCategory::News)
        );
    }

    #[test]
    fn empty_set_yields_no_data() {
        let records: Vec<SubscriptionRecord> = vec![record(
            "Paused",
            5.0,
            BillingCycle::Monthly,
            SubscriptionCategory::Other,
            today(),
        )
        .inactive()];
        assert!(AggregateService::most_expensive(&records).is_none());
        assert!(AggregateService::cheapest(&records).is_none());
        assert!(AggregateService::most_common_category(&records).is_none());
        assert!(AggregateService::most_common_cycle(&records).is_none());
        assert_eq!(AggregateService::average_monthly(&records), 0.0);

        let report = AggregateService::analytics(&records, AnalyticsPeriod::Year);
        assert_eq!(report.active_count, 0);
        assert_eq!(report.total, 0.0);
        assert!(report.breakdown.is_empty());
    }

    #[test]
    fn search_filters_and_sorts_by_name() {
        let records = fixture();
        let all: Vec<_> = AggregateService::search(&records, "", None)
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(all, vec!["Gym", "Netflix", "Spotify", "iCloud"]);

        let hits = AggregateService::search(&records, "NET", None);
        assert_eq!(hits.len(), 1);

        let streaming = AggregateService::search(&records, "", Some(SubscriptionCategory::Streaming));
        assert_eq!(streaming.len(), 1);

        let with_paused: Vec<_> =
            AggregateService::search_with(&records, "", Some(SubscriptionCategory::Streaming), true)
                .into_iter()
                .map(|r| r.name.as_str())
                .collect();
        assert_eq!(with_paused, vec!["Hulu", "Netflix"]);
        assert_eq!(streaming[0].name, "Netflix");
    }

    #[test]
    fn renewal_split_and_window() {
        let mut records = fixture();
        records[1].repetition_type = RepetitionType::Disabled;
        assert_eq!(AggregateService::without_auto_renewal(&records).len(), 1);
        assert_eq!(AggregateService::auto_renewing(&records).len(), 3);

        let week = AggregateService::renewals_within(&records, today(), 7);
        assert_eq!(week.len(), 2);
    }

    #[test]
    fn renewal_window_survives_extreme_horizons() {
        let records = fixture();
        let everything = AggregateService::renewals_within(&records, today(), i64::MAX);
        assert_eq!(everything.len(), AggregateService::upcoming_within(&records, today(), i64::MAX).len());
        assert!(AggregateService::renewals_within(&records, today(), -1).is_empty());
    }

    #[test]
    fn dashboard_bundles_counts() {
        let records = fixture();
        let summary = AggregateService::dashboard(&records, today());
        assert_eq!(summary.active_count, 4);
        assert_eq!(summary.upcoming_count, 2);
        assert_eq!(summary.overdue_count, 1);
    }
}
