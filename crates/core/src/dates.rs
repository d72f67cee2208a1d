//! Query date helpers.
//!
//! Availability is always queried for "tomorrow" relative to the caller's
//! clock, formatted as zero-padded `DD-MM-YYYY`.

use chrono::NaiveDate;

/// `strftime` pattern of the upstream `date` query parameter.
pub const QUERY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Format a date the way the availability APIs expect it.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

/// The day after `today`.
pub fn tomorrow(today: NaiveDate) -> NaiveDate {
    today.succ_opt().unwrap_or(NaiveDate::MAX)
}

/// Query date string for the day after `today`.
pub fn tomorrow_query_date(today: NaiveDate) -> String {
    format_query_date(tomorrow(today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pads_day_and_month() {
        assert_eq!(tomorrow_query_date(ymd(2026, 3, 4)), "05-03-2026");
    }

    #[test]
    fn rolls_over_month_end() {
        assert_eq!(tomorrow_query_date(ymd(2026, 4, 30)), "01-05-2026");
    }

    #[test]
    fn rolls_over_year_end() {
        assert_eq!(tomorrow_query_date(ymd(2026, 12, 31)), "01-01-2027");
    }

    #[test]
    fn handles_leap_day() {
        assert_eq!(tomorrow_query_date(ymd(2028, 2, 28)), "29-02-2028");
        assert_eq!(tomorrow_query_date(ymd(2027, 2, 28)), "01-03-2027");
    }
}
