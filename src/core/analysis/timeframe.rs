use chrono::{NaiveDate, Utc};

use crate::core::error::AnalysisError;
use crate::core::models::window::AnalysisWindow;

pub const DEFAULT_PERIOD_DAYS: u32 = 31;

/// Resolve the analysis window relative to the current UTC date.
///
/// Without an anchor the window ends yesterday, since today's billing data is
/// still incomplete.
pub fn resolve_window(anchor: Option<&str>, period_days: u32) -> Result<AnalysisWindow, AnalysisError> {
    resolve_window_at(anchor, period_days, Utc::now().date_naive())
}

pub fn resolve_window_at(
    anchor: Option<&str>,
    period_days: u32,
    today: NaiveDate,
) -> Result<AnalysisWindow, AnalysisError> {
    if period_days == 0 {
        return Err(AnalysisError::InvalidPeriod);
    }
    let end_date = match anchor {
        Some(input) => parse_anchor(input)?,
        None => today - chrono::Duration::days(1),
    };
    AnalysisWindow::new(end_date, period_days).ok_or(AnalysisError::InvalidPeriod)
}

fn parse_anchor(input: &str) -> Result<NaiveDate, AnalysisError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|source| {
        AnalysisError::InvalidDateFormat {
            input: input.to_string(),
            source,
        }
    })
}
