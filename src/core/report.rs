use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::models::cost::{CostBreakdown, ServiceTotal};
use crate::core::models::resources::ResourceCounts;

/// Maximum number of services listed in the ranking section.
const TOP_SERVICES: usize = 10;

/// All user-facing report wording lives here, so the assembly logic below
/// stays testable independently of the exact phrasing.
mod labels {
    pub const TITLE: &str = "=== AWS Daily Report ===";
    pub const RULE: &str = "==================================================";
    pub const COST_SECTION: &str = "Cost Summary";
    pub const RESOURCE_SECTION: &str = "Resource Summary";
    pub const DAILY_COSTS: &str = "Daily costs:";
    pub const TOP_SERVICES: &str = "Top services by cost (up to 10):";
    pub const COST_UNAVAILABLE: &str = "Cost data could not be retrieved.";
    pub const FOOTER: &str = "This report was generated automatically.";

    pub const COMPUTE_BLOCK: &str = "EC2 instances:";
    pub const DATABASE_BLOCK: &str = "RDS instances:";
    pub const STORAGE_BLOCK: &str = "S3 buckets:";
    pub const FUNCTIONS_BLOCK: &str = "Lambda functions:";
    pub const TOTAL: &str = "Total";
    pub const RUNNING: &str = "Running";
    pub const AVAILABLE: &str = "Available";

    pub fn period(days: u32) -> String {
        format!("Period: last {days} days")
    }

    pub fn generated(timestamp: &str) -> String {
        format!("Generated: {timestamp}")
    }

    pub fn window_total(days: u32, amount: &str) -> String {
        format!("Total ({days} days): {amount}")
    }

    pub fn daily_average(amount: &str) -> String {
        format!("Average (per day): {amount}")
    }

    pub fn subject(date: &str) -> String {
        format!("AWS Daily Report - {date}")
    }
}

/// Render a currency amount with exactly two decimals, using standard
/// (half-away-from-zero) rounding.
pub fn format_usd(amount: Decimal) -> String {
    let mut display = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    display.rescale(2);
    format!("${display}")
}

/// Subject line for the dispatched notification.
pub fn subject_line(date: NaiveDate) -> String {
    labels::subject(&date.format("%Y-%m-%d").to_string())
}

/// Assemble the full report text. Pure: no I/O, no clock access.
///
/// `cost` is `None` when the billing query failed; the cost section is then
/// replaced by a fixed notice while the resource section renders as usual.
pub fn render(
    cost: Option<&CostBreakdown>,
    resources: &ResourceCounts,
    days: u32,
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(labels::TITLE.to_string());
    lines.push(String::new());
    lines.push(labels::period(days));
    lines.push(labels::generated(
        &generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ));
    lines.push(String::new());

    lines.push(labels::COST_SECTION.to_string());
    lines.push(labels::RULE.to_string());
    lines.push(String::new());
    match cost {
        Some(breakdown) => render_cost_section(&mut lines, breakdown, days),
        None => lines.push(labels::COST_UNAVAILABLE.to_string()),
    }

    lines.push(String::new());
    lines.push(labels::RESOURCE_SECTION.to_string());
    lines.push(labels::RULE.to_string());
    lines.push(String::new());
    render_resource_section(&mut lines, resources);

    lines.push(String::new());
    lines.push(labels::RULE.to_string());
    lines.push(labels::FOOTER.to_string());

    lines.join("\n")
}

fn render_cost_section(lines: &mut Vec<String>, breakdown: &CostBreakdown, days: u32) {
    lines.push(labels::DAILY_COSTS.to_string());
    for (date, total) in &breakdown.daily {
        lines.push(format!("  {}: {}", date.format("%Y-%m-%d"), format_usd(*total)));
    }

    let total = breakdown.window_total();
    // days >= 1 is enforced by configuration, so this cannot divide by zero
    let average = total / Decimal::from(days);
    lines.push(String::new());
    lines.push(labels::window_total(days, &format_usd(total)));
    lines.push(labels::daily_average(&format_usd(average)));
    lines.push(String::new());

    lines.push(labels::TOP_SERVICES.to_string());
    for entry in ranked_services(breakdown) {
        lines.push(format!("  {}: {}", entry.service, format_usd(entry.amount)));
    }
}

fn render_resource_section(lines: &mut Vec<String>, resources: &ResourceCounts) {
    lines.push(labels::COMPUTE_BLOCK.to_string());
    lines.push(format!("  {}: {}", labels::TOTAL, resources.compute.total));
    lines.push(format!("  {}: {}", labels::RUNNING, resources.compute.running));
    lines.push(String::new());

    lines.push(labels::DATABASE_BLOCK.to_string());
    lines.push(format!("  {}: {}", labels::TOTAL, resources.database.total));
    lines.push(format!(
        "  {}: {}",
        labels::AVAILABLE,
        resources.database.available
    ));
    lines.push(String::new());

    lines.push(labels::STORAGE_BLOCK.to_string());
    lines.push(format!(
        "  {}: {}",
        labels::TOTAL,
        resources.storage.total_buckets
    ));
    lines.push(String::new());

    lines.push(labels::FUNCTIONS_BLOCK.to_string());
    lines.push(format!(
        "  {}: {}",
        labels::TOTAL,
        resources.functions.total_functions
    ));
}

/// Top services by total spend, descending. `sort_by` is stable, so ties
/// keep the order the billing API first grouped them in.
fn ranked_services(breakdown: &CostBreakdown) -> Vec<&ServiceTotal> {
    let mut ranked: Vec<&ServiceTotal> = breakdown.services.iter().collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(TOP_SERVICES);
    ranked
}
