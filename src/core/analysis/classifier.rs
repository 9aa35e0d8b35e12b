/// Amount, in billing currency units, the analysis-date cost may exceed the
/// baseline average before it is flagged.
pub const DEFAULT_ALERT_MARGIN: f64 = 0.10;

/// Fixed absolute-margin anomaly rule.
///
/// The standard deviation is reported alongside but not part of the rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertRule {
    pub margin: f64,
}

impl Default for AlertRule {
    fn default() -> Self {
        Self {
            margin: DEFAULT_ALERT_MARGIN,
        }
    }
}

impl AlertRule {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn is_anomalous(&self, analysis_date_cost: f64, average_cost: f64) -> bool {
        analysis_date_cost > average_cost + self.margin
    }
}
