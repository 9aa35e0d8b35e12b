use crate::core::analysis::aggregator::DailyCosts;
use crate::core::analysis::classifier::AlertRule;
use crate::core::models::report::GroupAnalysisResult;
use crate::core::models::window::{is_weekend, AnalysisWindow};

/// A group's daily costs over the window, split by day type.
///
/// Both buckets are dense: days missing from the billing data count as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBucket {
    pub weekday_costs: Vec<f64>,
    pub weekend_costs: Vec<f64>,
}

impl DayBucket {
    pub fn from_daily_costs(costs: &DailyCosts, window: &AnalysisWindow) -> Self {
        let mut bucket = Self {
            weekday_costs: Vec::with_capacity(window.len_days()),
            weekend_costs: Vec::new(),
        };
        for day in window.days() {
            let cost = costs.get(&day).copied().unwrap_or(0.0);
            if is_weekend(day) {
                bucket.weekend_costs.push(cost);
            } else {
                bucket.weekday_costs.push(cost);
            }
        }
        bucket
    }

    /// The bucket sharing the analysis date's day type.
    pub fn matching(&self, window: &AnalysisWindow) -> &[f64] {
        if window.analysis_is_weekend() {
            &self.weekend_costs
        } else {
            &self.weekday_costs
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStats {
    pub average: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub standard_deviation: f64,
    pub day_count: usize,
}

impl BaselineStats {
    pub fn from_costs(costs: &[f64]) -> Self {
        let n = costs.len();
        let average = if n > 0 {
            costs.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let standard_deviation = if n > 1 {
            let variance =
                costs.iter().map(|c| (c - average).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        Self {
            average,
            standard_deviation,
            day_count: n,
        }
    }

    /// Relative change against the average, in percent; 0 without a baseline.
    pub fn percent_variation(&self, cost: f64) -> f64 {
        if self.average != 0.0 {
            (cost - self.average) / self.average * 100.0
        } else {
            0.0
        }
    }
}

/// Score one group's analysis-date cost against a baseline bucket.
pub fn evaluate(
    group_key: &str,
    bucket: &[f64],
    analysis_date_cost: f64,
    window: &AnalysisWindow,
    rule: &AlertRule,
) -> GroupAnalysisResult {
    let stats = BaselineStats::from_costs(bucket);
    GroupAnalysisResult {
        group_key: group_key.to_string(),
        average_cost: stats.average,
        standard_deviation: stats.standard_deviation,
        analysis_date_cost,
        alert: rule.is_anomalous(analysis_date_cost, stats.average),
        percent_variation: stats.percent_variation(analysis_date_cost),
        cost_difference: analysis_date_cost - stats.average,
        day_count: stats.day_count,
        start_date: window.start_date,
        end_date: window.end_date,
        analysis_date: window.analysis_date,
    }
}

/// Full per-group pipeline: zero-filled day-type bucket, statistics, verdict.
pub fn analyze_group(
    group_key: &str,
    costs: &DailyCosts,
    window: &AnalysisWindow,
    rule: &AlertRule,
) -> GroupAnalysisResult {
    let bucket = DayBucket::from_daily_costs(costs, window);
    let analysis_date_cost = costs.get(&window.analysis_date).copied().unwrap_or(0.0);
    evaluate(group_key, bucket.matching(window), analysis_date_cost, window, rule)
}
