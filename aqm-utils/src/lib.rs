//! Shared utility functions for AQM crates.

/// Date utility functions
pub mod dates {
    use anyhow::anyhow;
    use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

    /// Calendar date format accepted on every public boundary: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a calendar date.
    ///
    /// Accepts "YYYY-MM-DD" or a full RFC 3339 timestamp, in which case the
    /// UTC calendar day of that instant is returned.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc).date_naive())
            .map_err(|e| anyhow!("`{s}` is neither YYYY-MM-DD nor RFC 3339: {e}"))
    }

    /// Parse an instant. A bare "YYYY-MM-DD" resolves to midnight UTC of that day.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(|date| midnight_utc(&date))
            .map_err(|e| anyhow!("`{s}` is neither RFC 3339 nor YYYY-MM-DD: {e}"))
    }

    /// Midnight UTC at the start of `date`.
    pub fn midnight_utc(date: &NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Whole calendar months from `start` to `end`, ignoring the day of month.
    /// Negative when `end` is in an earlier month.
    pub fn months_between(start: &NaiveDate, end: &NaiveDate) -> i64 {
        let years = i64::from(end.year() - start.year());
        let months = i64::from(end.month()) - i64::from(start.month());
        years * 12 + months
    }

    /// Add `n` calendar months, clamping the day to the end of shorter months.
    /// Saturates at `NaiveDate::MAX`.
    pub fn add_months(date: &NaiveDate, n: u32) -> NaiveDate {
        date.checked_add_months(Months::new(n))
            .unwrap_or(NaiveDate::MAX)
    }

}

/// Numeric helpers
pub mod numeric {
    /// Round `value` to `decimals` places, half away from zero.
    pub fn round_to(value: f64, decimals: u32) -> f64 {
        let factor = 10f64.powi(decimals as i32);
        (value * factor).round() / factor
    }

}
