use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::billing::response::BillingRow;
use crate::core::models::record::CostRecord;
use crate::core::models::window::AnalysisWindow;

/// Cost per day for a single group.
pub type DailyCosts = BTreeMap<NaiveDate, f64>;

/// Daily costs keyed by group, ordered by group key then date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostSeries {
    groups: BTreeMap<String, DailyCosts>,
}

impl CostSeries {
    /// Rows repeating a (group, date) pair are summed.
    pub fn insert(&mut self, record: CostRecord) {
        *self
            .groups
            .entry(record.group_key)
            .or_default()
            .entry(record.date)
            .or_insert(0.0) += record.amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DailyCosts)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub series: CostSeries,
    /// Sum of every kept row dated on the analysis date
    pub analysis_date_total: f64,
}

/// Group billing rows by the key `key_of` extracts.
///
/// Rows without a key (or with a blank one) are dropped.
pub fn aggregate<F>(rows: &[BillingRow], window: &AnalysisWindow, key_of: F) -> Aggregation
where
    F: Fn(&BillingRow) -> Option<String>,
{
    let mut aggregation = Aggregation::default();
    for row in rows {
        let Some(group_key) = key_of(row).filter(|k| !k.trim().is_empty()) else {
            continue;
        };
        if row.date == window.analysis_date {
            aggregation.analysis_date_total += row.amount;
        }
        aggregation.series.insert(CostRecord {
            date: row.date,
            amount: row.amount,
            group_key,
        });
    }
    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn row(amount: f64, day: u32, dimension: &str, tag: Option<&str>) -> BillingRow {
        BillingRow {
            amount,
            date: date(day),
            dimension: Some(dimension.to_string()),
            tag_value: tag.map(str::to_string),
        }
    }

    fn window() -> AnalysisWindow {
        AnalysisWindow::new(date(10), 9).unwrap()
    }

    fn costs<'a>(series: &'a CostSeries, key: &str) -> &'a DailyCosts {
        series.iter().find(|(k, _)| k.as_str() == key).map(|(_, c)| c).unwrap()
    }

    #[test]
    fn groups_rows_by_key() {
        let rows = vec![
            row(10.0, 8, "Compute", None),
            row(5.0, 8, "Storage", None),
            row(12.0, 9, "Compute", None),
        ];
        let agg = aggregate(&rows, &window(), |r| r.dimension.clone());
        assert_eq!(agg.series.len(), 2);
        let compute = costs(&agg.series, "Compute");
        assert_eq!(compute.get(&date(8)), Some(&10.0));
        assert_eq!(compute.get(&date(9)), Some(&12.0));
        assert_eq!(costs(&agg.series, "Storage").len(), 1);
    }

    #[test]
    fn totals_cost_on_analysis_date_across_groups() {
        let rows = vec![
            row(10.0, 10, "Compute", None),
            row(2.5, 10, "Storage", None),
            row(99.0, 9, "Compute", None),
        ];
        let agg = aggregate(&rows, &window(), |r| r.dimension.clone());
        assert!((agg.analysis_date_total - 12.5).abs() < 1e-9);
    }

    #[test]
    fn drops_rows_without_tag_value() {
        let rows = vec![
            row(1.0, 6, "Compute", Some("alpha")),
            row(2.0, 7, "Compute", None),
            row(3.0, 8, "Compute", Some("beta")),
            row(4.0, 10, "Compute", Some("")),
            row(5.0, 10, "Compute", Some("alpha")),
        ];
        let agg = aggregate(&rows, &window(), |r| r.tag_value.clone());
        assert_eq!(agg.series.len(), 2);
        let keys: Vec<&String> = agg.series.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "beta"]);
        // The blank-tag row on the analysis date does not count either
        assert!((agg.analysis_date_total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_dates_are_summed() {
        let rows = vec![row(1.5, 8, "Compute", None), row(2.5, 8, "Compute", None)];
        let agg = aggregate(&rows, &window(), |r| r.dimension.clone());
        assert_eq!(costs(&agg.series, "Compute").get(&date(8)), Some(&4.0));
    }
}
