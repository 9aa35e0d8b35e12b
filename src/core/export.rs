use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::core::error::AnalysisError;
use crate::core::models::report::CombinedReport;

/// `{prefix}_{groupingKey}_{analysisDate}.xlsx`, with path separators in the
/// prefix and key replaced.
pub fn report_file_name(common_prefix: &str, grouping_key: &str, analysis_date: NaiveDate) -> String {
    let clean = |s: &str| s.trim().replace(['/', '\\'], "_");
    format!(
        "{}_{}_{}.xlsx",
        clean(common_prefix),
        clean(grouping_key),
        analysis_date.format("%Y-%m-%d")
    )
}

/// Write the combined report as a single-sheet workbook under `directory`.
pub fn save_report(
    report: &CombinedReport,
    directory: &Path,
    common_prefix: &str,
    grouping_key: &str,
) -> Result<PathBuf, AnalysisError> {
    let path = directory.join(report_file_name(
        common_prefix,
        grouping_key,
        report.window.analysis_date,
    ));
    write_workbook(report, &path).map_err(|e| AnalysisError::PersistenceFailure {
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(path)
}

fn write_workbook(report: &CombinedReport, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Cost Analysis")?;

    for (col, title) in report.columns().into_iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, &header)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let result = &row.result;
        sheet.write_string(r, 0, row.subscription.as_str())?;
        sheet.write_string(r, 1, result.group_key.as_str())?;
        sheet.write_number(r, 2, result.average_cost)?;
        sheet.write_number(r, 3, result.standard_deviation)?;
        sheet.write_number(r, 4, result.analysis_date_cost)?;
        sheet.write_string(r, 5, result.alert_label())?;
        sheet.write_number(r, 6, result.percent_variation)?;
        sheet.write_number(r, 7, result.cost_difference)?;
        sheet.write_string(r, 8, result.start_date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(r, 9, result.end_date.format("%Y-%m-%d").to_string())?;
        sheet.write_number(r, 10, result.day_count as f64)?;
        sheet.write_string(r, 11, result.analysis_date.format("%Y-%m-%d").to_string())?;
    }

    workbook.save(path)
}
