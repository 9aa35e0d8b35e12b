use colored::{control, Colorize};

use crate::core::formatter::{format_amount, format_date_with_weekday, format_percent, truncate};
use crate::core::models::report::{EmptyReason, GroupAnalysisResult, SubscriptionReport};

const MAX_GROUP_WIDTH: usize = 32;

/// Render one subscription block as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Contoso Prod (1111-2222)
///   Analysis  2024-05-10 (Fri), baseline from 2024-04-09
///   Total     1234.500 on analysis date
///   ServiceName        Average   Std Dev      Cost   Variation     Diff  Days  Alert
///   Virtual Machines   100.000     0.000   115.000    +15.000%   15.000    23  Yes
/// ```
pub fn render_subscription(
    report: &SubscriptionReport,
    group_label: &str,
    alert_only: bool,
    use_color: bool,
) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(
        format!(" {} ({})", report.subscription_name, report.subscription_id)
            .bold()
            .to_string(),
    );

    let rows: Vec<&GroupAnalysisResult> = report
        .rows
        .iter()
        .filter(|r| !alert_only || r.alert)
        .collect();

    if let Some(first) = report.rows.first() {
        lines.push(format!(
            "  {}  {}, baseline from {}",
            "Analysis".cyan(),
            format_date_with_weekday(first.analysis_date),
            first.start_date.format("%Y-%m-%d")
        ));
        lines.push(format!(
            "  {}     {} on analysis date",
            "Total".cyan(),
            format_amount(report.analysis_date_total)
        ));
    }

    let empty_reason = if report.rows.is_empty() {
        Some(EmptyReason::NoCostFound)
    } else if rows.is_empty() {
        Some(EmptyReason::NoAlertsFound)
    } else {
        None
    };
    if let Some(reason) = empty_reason {
        lines.push(format!("  {}", reason.to_string().dimmed()));
        return lines.join("\n");
    }

    let width = rows
        .iter()
        .map(|r| r.group_key.chars().count())
        .chain(std::iter::once(group_label.chars().count()))
        .max()
        .unwrap_or(0)
        .min(MAX_GROUP_WIDTH);

    let header = format!(
        "{:<width$}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>4}  {}",
        truncate(group_label, width),
        "Average",
        "Std Dev",
        "Cost",
        "Variation",
        "Diff",
        "Days",
        "Alert",
        width = width
    );
    lines.push(format!("  {}", header.cyan()));

    for result in rows {
        let line = format!(
            "{:<width$}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>4}  {}",
            truncate(&result.group_key, width),
            format_amount(result.average_cost),
            format_amount(result.standard_deviation),
            format_amount(result.analysis_date_cost),
            format_percent(result.percent_variation),
            format_amount(result.cost_difference),
            result.day_count,
            result.alert_label(),
            width = width
        );
        if result.alert {
            lines.push(format!("  {}", line.red().bold()));
        } else {
            lines.push(format!("  {}", line));
        }
    }

    lines.join("\n")
}
