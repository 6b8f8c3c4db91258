use subtrack_core::{aggregate::UPCOMING_WINDOW_DAYS, AggregateService};
use subtrack_domain::AnalyticsPeriod;

use super::CommandDefinition;
use crate::cli::context::ShellContext;
use crate::cli::format::{format_amount, or_not_available, record_row};
use crate::cli::output;
use crate::errors::{CommandError, CommandResult};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "upcoming",
            "Subscriptions billing soon, soonest first",
            "upcoming",
            cmd_upcoming,
        ),
        CommandDefinition::new(
            "overdue",
            "Active subscriptions whose billing date has passed",
            "overdue",
            cmd_overdue,
        ),
        CommandDefinition::new(
            "summary",
            "Dashboard totals and counts",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "analytics",
            "Spending analytics for a month or a year",
            "analytics [month|year]",
            cmd_analytics,
        ),
    ]
}

fn cmd_upcoming(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.today();
    let window = context.config().upcoming_window_days;
    let upcoming = AggregateService::upcoming_within(context.store().records(), today, window);
    if upcoming.is_empty() {
        output::info(format!("Nothing due in the next {window} days."));
        return Ok(());
    }
    for record in upcoming {
        output::info(record_row(record, today, context.currency()));
    }
    Ok(())
}

fn cmd_overdue(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.today();
    let overdue = context.store().overdue(today);
    if overdue.is_empty() {
        output::info("No overdue subscriptions.");
        return Ok(());
    }
    for record in overdue {
        output::info(record_row(record, today, context.currency()));
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.today();
    let currency = context.currency();
    let records = context.store().records();
    let window = context.config().upcoming_window_days;
    let summary = AggregateService::dashboard(records, today);
    let upcoming = AggregateService::upcoming_within(records, today, window).len();

    output::section(format!("Dashboard ({today})"));
    output::field("Active subscriptions", summary.active_count);
    output::field("Monthly spending", format_amount(summary.total_monthly, currency));
    output::field("Yearly spending", format_amount(summary.total_yearly, currency));
    output::field(
        "Average per month",
        format_amount(AggregateService::average_monthly(records), currency),
    );
    output::field(&format!("Upcoming ({window} days)"), upcoming);
    output::field(
        "Renewing this week",
        AggregateService::renewals_within(records, today, UPCOMING_WINDOW_DAYS).len(),
    );
    output::field("Overdue", summary.overdue_count);
    output::field(
        "Auto-renewing",
        AggregateService::auto_renewing(records).len(),
    );
    output::field(
        "Manual renewal",
        AggregateService::without_auto_renewal(records).len(),
    );
    Ok(())
}

fn cmd_analytics(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = match args.first() {
        None => AnalyticsPeriod::default(),
        Some(raw) => AnalyticsPeriod::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown period `{raw}` (month, year)"))
        })?,
    };
    let currency = context.currency();
    let report = context.store().analytics(period);

    output::section(format!("Analytics ({period})"));
    output::field("Total", format_amount(report.total, currency));
    output::field("Active subscriptions", report.active_count);
    output::field(
        "Average per month",
        format_amount(report.average_monthly, currency),
    );
    output::field("Most expensive", or_not_available(report.most_expensive));
    output::field("Cheapest", or_not_available(report.cheapest));
    output::field(
        "Most common cycle",
        or_not_available(report.most_common_cycle),
    );
    output::field(
        "Most common category",
        or_not_available(report.most_common_category),
    );

    output::section("Spending by category");
    if report.breakdown.is_empty() {
        output::info("  No spending recorded.");
    }
    for entry in &report.breakdown {
        output::info(format!(
            "  {:<16} {:>12}  ({})",
            entry.category.label(),
            format_amount(entry.amount, currency),
            entry.count
        ));
    }
    Ok(())
}
