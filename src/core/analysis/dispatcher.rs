use crate::core::analysis::aggregator::{aggregate, Aggregation};
use crate::core::analysis::baseline::analyze_group;
use crate::core::analysis::classifier::AlertRule;
use crate::core::billing::response::BillingRow;
use crate::core::models::report::{GroupAnalysisResult, SubscriptionReport};
use crate::core::models::window::AnalysisWindow;

/// How cost rows are grouped before analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    /// One result per value of a cost-allocation dimension (e.g. `ServiceName`)
    Dimension(String),
    /// One result per value of a resource tag; untagged cost is ignored
    Tag(String),
    /// One result for the whole subscription
    Subscription,
}

impl AnalysisMode {
    /// Parse the command-line analysis type.
    pub fn from_args(analysis_type: &str, grouping_key: Option<&str>) -> Option<Self> {
        let key = grouping_key.map(str::trim).filter(|k| !k.is_empty());
        match analysis_type.to_lowercase().as_str() {
            "group" => key.map(|k| Self::Dimension(k.to_string())),
            "tag" => key.map(|k| Self::Tag(k.to_string())),
            "subscription" => Some(Self::Subscription),
            _ => None,
        }
    }

    /// Grouping type and name sent to the billing API.
    pub fn grouping(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Dimension(name) => Some(("Dimension", name.as_str())),
            Self::Tag(name) => Some(("TagKey", name.as_str())),
            Self::Subscription => None,
        }
    }

    /// Header of the grouping column in reports.
    pub fn group_label(&self) -> &str {
        match self {
            Self::Dimension(name) | Self::Tag(name) => name.as_str(),
            Self::Subscription => "Subscription",
        }
    }

    fn group_key(&self, row: &BillingRow, subscription_name: &str) -> Option<String> {
        match self {
            Self::Dimension(_) => row.dimension.clone(),
            Self::Tag(_) => row.tag_value.clone(),
            Self::Subscription => Some(subscription_name.to_string()),
        }
    }
}

/// Run the per-group pipeline over one subscription's billing rows.
///
/// `rows` is `None` when the billing API reported no cost data. Subscription
/// mode always yields exactly one result; the other modes yield one per group
/// seen in the data, possibly none.
pub fn analyze_subscription(
    mode: &AnalysisMode,
    subscription_name: &str,
    subscription_id: &str,
    rows: Option<&[BillingRow]>,
    window: &AnalysisWindow,
    rule: &AlertRule,
) -> SubscriptionReport {
    let rows = rows.unwrap_or_default();
    let Aggregation {
        series,
        analysis_date_total,
    } = aggregate(rows, window, |row| mode.group_key(row, subscription_name));

    tracing::debug!(
        subscription = subscription_name,
        rows = rows.len(),
        groups = series.len(),
        "Aggregated cost rows"
    );

    let results: Vec<GroupAnalysisResult> = match mode {
        AnalysisMode::Subscription if series.is_empty() => {
            vec![GroupAnalysisResult::empty(subscription_name, window)]
        }
        _ => series
            .iter()
            .map(|(group_key, costs)| analyze_group(group_key, costs, window, rule))
            .collect(),
    };

    tracing::debug!(
        subscription = subscription_name,
        groups = results.len(),
        alerts = results.iter().filter(|r| r.alert).count(),
        "Analysed subscription"
    );

    SubscriptionReport {
        subscription_name: subscription_name.to_string(),
        subscription_id: subscription_id.to_string(),
        analysis_date_total,
        rows: results,
    }
}
