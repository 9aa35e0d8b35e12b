use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::models::window::AnalysisWindow;

/// Baseline statistics and anomaly verdict for one group on the analysis date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAnalysisResult {
    pub group_key: String,
    pub average_cost: f64,
    pub standard_deviation: f64,
    pub analysis_date_cost: f64,
    pub alert: bool,
    pub percent_variation: f64,
    pub cost_difference: f64,
    /// Number of days in the baseline bucket
    pub day_count: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub analysis_date: NaiveDate,
}

impl GroupAnalysisResult {
    /// All-zero record used when a subscription has no cost data at all.
    pub fn empty(group_key: impl Into<String>, window: &AnalysisWindow) -> Self {
        Self {
            group_key: group_key.into(),
            average_cost: 0.0,
            standard_deviation: 0.0,
            analysis_date_cost: 0.0,
            alert: false,
            percent_variation: 0.0,
            cost_difference: 0.0,
            day_count: 0,
            start_date: window.start_date,
            end_date: window.end_date,
            analysis_date: window.analysis_date,
        }
    }

    pub fn alert_label(&self) -> &'static str {
        if self.alert {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Why a subscription contributed no rows to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoCostFound,
    NoAlertsFound,
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCostFound => write!(f, "No cost found"),
            Self::NoAlertsFound => write!(f, "No alerts found"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionReport {
    pub subscription_name: String,
    pub subscription_id: String,
    /// Total cost booked on the analysis date across every grouped row
    pub analysis_date_total: f64,
    pub rows: Vec<GroupAnalysisResult>,
}

/// A result row tagged with the (short) name of the subscription it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub subscription: String,
    #[serde(flatten)]
    pub result: GroupAnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionNote {
    pub subscription: String,
    pub reason: EmptyReason,
}

/// Rows from every subscription, in subscription order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedReport {
    /// Header of the grouping column: the grouping key, or `Subscription`
    pub group_label: String,
    pub window: AnalysisWindow,
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<SubscriptionNote>,
}

pub const SUBSCRIPTION_COLUMN: &str = "Subscription Name";

impl CombinedReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers in canonical order, subscription tag first.
    pub fn columns(&self) -> Vec<&str> {
        vec![
            SUBSCRIPTION_COLUMN,
            self.group_label.as_str(),
            "Average Cost",
            "Standard Deviation",
            "Analysis Date Cost",
            "Alert",
            "Percent Variation",
            "Cost Difference",
            "Start Date",
            "End Date",
            "Number of Days",
            "Analysis Date",
        ]
    }
}
