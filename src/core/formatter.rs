use chrono::{Datelike, NaiveDate};

/// Amounts are shown with three decimals, matching the saved report.
pub fn format_amount(amount: f64) -> String {
    format!("{:.3}", amount)
}

/// Returns "+15.000%" / "-2.500%".
pub fn format_percent(percent: f64) -> String {
    format!("{:+.3}%", percent)
}

/// Returns "2024-05-10 (Fri)".
pub fn format_date_with_weekday(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        chrono::Weekday::Mon => "Mon",
        chrono::Weekday::Tue => "Tue",
        chrono::Weekday::Wed => "Wed",
        chrono::Weekday::Thu => "Thu",
        chrono::Weekday::Fri => "Fri",
        chrono::Weekday::Sat => "Sat",
        chrono::Weekday::Sun => "Sun",
    };
    format!("{} ({})", date.format("%Y-%m-%d"), weekday)
}

/// Truncate to `width` characters, ending with "…" when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_amount_three_decimals() {
        assert_eq!(format_amount(115.0), "115.000");
        assert_eq!(format_amount(0.12345), "0.123");
        assert_eq!(format_amount(-2.5), "-2.500");
    }

    #[test]
    fn format_percent_signed() {
        assert_eq!(format_percent(15.0), "+15.000%");
        assert_eq!(format_percent(-2.5), "-2.500%");
    }

    #[test]
    fn format_date_includes_weekday() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(format_date_with_weekday(date), "2024-05-10 (Fri)");
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("Virtual Machines", 8), "Virtual…");
        assert_eq!(truncate("Storage", 8), "Storage");
    }
}
