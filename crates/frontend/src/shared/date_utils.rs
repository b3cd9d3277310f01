/// Utilities for bill date formatting
///
/// Bills are displayed with ISO dates so that rows sort the same way as text.
use contracts::domain::a001_bill::aggregate::{parse_bill_date, BILL_DATE_FORMAT};

/// Format a stored bill date as `YYYY-MM-DD`
/// Example: "2004-04-04T00:00:00Z" -> "2004-04-04"
///
/// An unparsable value is returned unchanged and a warning is logged.
pub fn format_date(date_str: &str) -> String {
    match parse_bill_date(date_str) {
        Some(date) => date.format(BILL_DATE_FORMAT).to_string(),
        None => {
            log::warn!("Unparsable bill date '{}', displayed as is", date_str);
            date_str.to_string()
        }
    }
}
