use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive date range analysed in one run.
///
/// `analysis_date` is always `end_date`: the most recent complete billing day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub analysis_date: NaiveDate,
}

impl AnalysisWindow {
    /// `None` when `end_date - period_days` falls outside the calendar range.
    pub fn new(end_date: NaiveDate, period_days: u32) -> Option<Self> {
        let start_date = end_date.checked_sub_days(Days::new(u64::from(period_days)))?;
        Some(Self {
            start_date,
            end_date,
            analysis_date: end_date,
        })
    }

    /// Every calendar day from `start_date` to `end_date`, both included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |day| *day <= self.end_date)
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> usize {
        (self.end_date - self.start_date).num_days() as usize + 1
    }

    pub fn analysis_is_weekend(&self) -> bool {
        is_weekend(self.analysis_date)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
