use chrono::NaiveDate;
use subtrack_core::{validation::parse_price, AggregateService};
use subtrack_domain::{BillingCycle, RepetitionType, SubscriptionCategory, SubscriptionRecord};
use uuid::Uuid;

use super::{CommandDefinition, ParsedArgs};
use crate::cli::context::ShellContext;
use crate::cli::format::{format_amount, record_row, short_id};
use crate::cli::output;
use crate::errors::{CommandError, CommandResult};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "list",
            "List subscriptions by name",
            "list [query] [--category <category>] [--all]",
            cmd_list,
        ),
        CommandDefinition::new(
            "add",
            "Add a subscription",
            "add <name> <price> <cycle> <category> <YYYY-MM-DD> [--repeat <type>] [--notes <text>] [--color <name>]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Change fields of a subscription",
            "edit <id|name> [--name <name>] [--price <price>] [--cycle <cycle>] [--category <category>] [--date <YYYY-MM-DD>] [--repeat <type>] [--notes <text>] [--color <name>]",
            cmd_edit,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a subscription by id prefix or name",
            "delete <id|name>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "toggle",
            "Pause or resume a subscription",
            "toggle <id|name>",
            cmd_toggle,
        ),
        CommandDefinition::new(
            "renew",
            "Advance overdue auto-renewing subscriptions",
            "renew",
            cmd_renew,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["category"], &["all"])?;
    let query = parsed.positional.join(" ");
    let category = parsed.option("category").map(parse_category).transpose()?;

    let records = AggregateService::search_with(
        context.store().records(),
        &query,
        category,
        parsed.switch("all"),
    );

    if records.is_empty() {
        output::info("No subscriptions found.");
        return Ok(());
    }
    let today = context.today();
    for record in records {
        output::info(record_row(record, today, context.currency()));
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["repeat", "notes", "color"], &[])?;
    let [name, price, cycle, category, date] = parsed.positional[..] else {
        return Err(CommandError::InvalidArguments(
            "usage: add <name> <price> <cycle> <category> <YYYY-MM-DD>".into(),
        ));
    };

    let price = parse_price(price)?;
    let cycle = parse_cycle(cycle)?;
    let category = parse_category(category)?;
    let next_billing_date = parse_date(date)?;

    let mut record = SubscriptionRecord::new(name, price, cycle, category, next_billing_date);
    if let Some(repeat) = parsed.option("repeat") {
        record = record.with_repetition(parse_repetition(repeat)?);
    }
    if let Some(notes) = parsed.option("notes") {
        record = record.with_notes(notes);
    }
    if let Some(color) = parsed.option("color") {
        record = record.with_color(color);
    }

    let id = context.store_mut().add(record)?;
    output::success(format!(
        "Added `{}` ({}) at {} {}.",
        name.trim(),
        short_id(id),
        format_amount(price, context.currency()),
        cycle.label().to_lowercase()
    ));

    catch_up(context, id);
    context.report_persistence();
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(
        args,
        &["name", "price", "cycle", "category", "date", "repeat", "notes", "color"],
        &[],
    )?;
    if parsed.positional.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id|name> [--name <name>] [--price <price>] ...".into(),
        ));
    }
    let id = context.resolve_id(&parsed.positional.join(" "))?;
    let Some(mut record) = context.store().get(id).cloned() else {
        return Err(CommandError::NoMatch(id.to_string()));
    };

    let mut changed = false;
    if let Some(name) = parsed.option("name") {
        record.name = name.trim().to_string();
        changed = true;
    }
    if let Some(price) = parsed.option("price") {
        record.price = parse_price(price)?;
        changed = true;
    }
    if let Some(cycle) = parsed.option("cycle") {
        record.billing_cycle = parse_cycle(cycle)?;
        changed = true;
    }
    if let Some(category) = parsed.option("category") {
        record.category = parse_category(category)?;
        changed = true;
    }
    if let Some(date) = parsed.option("date") {
        record.next_billing_date = parse_date(date)?;
        changed = true;
    }
    if let Some(repeat) = parsed.option("repeat") {
        record.repetition_type = parse_repetition(repeat)?;
        changed = true;
    }
    if let Some(notes) = parsed.option("notes") {
        record.notes = notes.to_string();
        changed = true;
    }
    if let Some(color) = parsed.option("color") {
        record.color = color.to_string();
        changed = true;
    }
    if !changed {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one of --name, --price, --cycle, --category, --date, --repeat, --notes, --color".into(),
        ));
    }

    let name = record.name.clone();
    if context.store_mut().update(record)? {
        output::success(format!("Updated `{name}` ({}).", short_id(id)));
    }
    catch_up(context, id);
    context.report_persistence();
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = single_target(args, "delete <id|name>")?;
    let id = context.resolve_id(&needle)?;
    let name = context
        .store()
        .get(id)
        .map(|record| record.name.clone())
        .unwrap_or_default();
    if context.store_mut().delete(id) {
        output::success(format!("Deleted `{name}`."));
    }
    context.report_persistence();
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = single_target(args, "toggle <id|name>")?;
    let id = context.resolve_id(&needle)?;
    if let Some(active) = context.store_mut().toggle_active(id) {
        let name = context
            .store()
            .get(id)
            .map(|record| record.name.as_str())
            .unwrap_or_default();
        let state = if active { "resumed" } else { "paused" };
        output::success(format!("`{name}` {state}."));
    }
    context.report_persistence();
    Ok(())
}

fn cmd_renew(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.today();
    let renewed = context.store_mut().process_renewals(today);
    if renewed.is_empty() {
        output::info("Nothing to renew.");
        return Ok(());
    }
    output::success(format!("Renewed {} subscription(s).", renewed.len()));
    for id in renewed {
        if let Some(record) = context.store().get(id) {
            output::info(format!("  {} -> {}", record.name, record.next_billing_date));
        }
    }
    context.report_persistence();
    Ok(())
}

/// A past date on an auto-renewing record is caught up right away.
fn catch_up(context: &mut ShellContext, id: Uuid) {
    let today = context.today();
    if context.store_mut().process_renewals(today).contains(&id) {
        if let Some(record) = context.store().get(id) {
            output::info(format!("Next billing date advanced to {}.", record.next_billing_date));
        }
    }
}

fn parse_cycle(value: &str) -> Result<BillingCycle, CommandError> {
    BillingCycle::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown billing cycle `{value}` (weekly, monthly, quarterly, yearly)"
        ))
    })
}

fn parse_repetition(value: &str) -> Result<RepetitionType, CommandError> {
    RepetitionType::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown repetition `{value}` (disabled, weekly, monthly, quarterly, yearly)"
        ))
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{value}`; expected YYYY-MM-DD"))
    })
}

fn parse_category(value: &str) -> Result<SubscriptionCategory, CommandError> {
    SubscriptionCategory::parse(value)
        .ok_or_else(|| CommandError::InvalidArguments(format!("unknown category `{value}`")))
}

/// Joins the arguments so unquoted multi-word names still resolve.
fn single_target(args: &[&str], usage: &str) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(args.join(" "))
}
