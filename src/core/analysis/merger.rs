use crate::core::models::report::{
    CombinedReport, EmptyReason, ReportRow, SubscriptionNote, SubscriptionReport,
};
use crate::core::models::window::AnalysisWindow;
use crate::core::subscriptions::short_name;

/// Combine per-subscription results into a single report.
///
/// Rows are tagged with the subscription name stripped of `common_prefix` and
/// kept in subscription order. With `alert_only`, rows without an alert are
/// dropped and subscriptions left without rows get a textual note.
pub fn merge(
    reports: &[SubscriptionReport],
    group_label: &str,
    window: &AnalysisWindow,
    common_prefix: &str,
    alert_only: bool,
) -> CombinedReport {
    let mut rows = Vec::new();
    let mut notes = Vec::new();

    for report in reports {
        let subscription = short_name(&report.subscription_name, common_prefix);
        if report.rows.is_empty() {
            notes.push(SubscriptionNote {
                subscription,
                reason: EmptyReason::NoCostFound,
            });
            continue;
        }

        let kept: Vec<ReportRow> = report
            .rows
            .iter()
            .filter(|r| !alert_only || r.alert)
            .map(|r| ReportRow {
                subscription: subscription.clone(),
                result: r.clone(),
            })
            .collect();

        if kept.is_empty() {
            tracing::info!(subscription = %report.subscription_name, "No alerts found");
            notes.push(SubscriptionNote {
                subscription,
                reason: EmptyReason::NoAlertsFound,
            });
        } else {
            if alert_only {
                tracing::info!(
                    subscription = %report.subscription_name,
                    alerts = kept.len(),
                    "Alerts found"
                );
            }
            rows.extend(kept);
        }
    }

    CombinedReport {
        group_label: group_label.to_string(),
        window: *window,
        rows,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::report::GroupAnalysisResult;
    use chrono::NaiveDate;

    fn window() -> AnalysisWindow {
        AnalysisWindow::new(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), 31).unwrap()
    }

    fn result(key: &str, alert: bool) -> GroupAnalysisResult {
        GroupAnalysisResult {
            alert,
            ..GroupAnalysisResult::empty(key, &window())
        }
    }

    fn report(name: &str, rows: Vec<GroupAnalysisResult>) -> SubscriptionReport {
        SubscriptionReport {
            subscription_name: name.to_string(),
            subscription_id: format!("id-{name}"),
            analysis_date_total: 0.0,
            rows,
        }
    }

    #[test]
    fn alert_only_keeps_single_anomalous_row() {
        let reports = vec![
            report("Contoso A", vec![result("Compute", false), result("Storage", false)]),
            report("Contoso B", vec![result("Compute", false), result("Network", true)]),
            report("Contoso C", vec![result("Compute", false)]),
        ];
        let combined = merge(&reports, "ServiceName", &window(), "Contoso ", true);
        assert_eq!(combined.rows.len(), 1);
        assert_eq!(combined.rows[0].subscription, "B");
        assert_eq!(combined.rows[0].result.group_key, "Network");
        let noted: Vec<(&str, EmptyReason)> = combined
            .notes
            .iter()
            .map(|n| (n.subscription.as_str(), n.reason))
            .collect();
        assert_eq!(
            noted,
            vec![("A", EmptyReason::NoAlertsFound), ("C", EmptyReason::NoAlertsFound)]
        );
    }

    #[test]
    fn full_merge_preserves_subscription_order() {
        let reports = vec![
            report("Contoso B", vec![result("Compute", false)]),
            report("Contoso A", vec![result("Compute", true), result("Storage", false)]),
        ];
        let combined = merge(&reports, "ServiceName", &window(), "Contoso ", false);
        let tags: Vec<&str> = combined.rows.iter().map(|r| r.subscription.as_str()).collect();
        assert_eq!(tags, vec!["B", "A", "A"]);
        assert!(combined.notes.is_empty());
        assert_eq!(combined.group_label, "ServiceName");
    }

    #[test]
    fn subscriptions_without_rows_are_skipped() {
        let reports = vec![
            report("Contoso A", vec![]),
            report("Contoso B", vec![result("Compute", false)]),
        ];
        let combined = merge(&reports, "ServiceName", &window(), "Contoso ", false);
        assert_eq!(combined.rows.len(), 1);
        assert_eq!(combined.notes.len(), 1);
        assert_eq!(combined.notes[0].reason, EmptyReason::NoCostFound);
    }

    #[test]
    fn single_subscription_keeps_full_name() {
        let reports = vec![report("Contoso Prod", vec![result("Compute", false)])];
        let combined = merge(&reports, "ServiceName", &window(), "Contoso Prod", false);
        assert_eq!(combined.rows[0].subscription, "Contoso Prod");
    }
}
