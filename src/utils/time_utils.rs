use chrono::{Datelike, Months, NaiveDate};

use crate::constants::MONTH_KEY_FORMAT;

/// Advances a date by whole months, clamping the day into shorter months
/// (Jan 31 + 1 month lands on Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// "YYYY-MM" key for a date's month
pub fn month_key(date: NaiveDate) -> String {
    date.format(MONTH_KEY_FORMAT).to_string()
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// First day of the given month, if the year/month pair is valid
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Inclusive first/last day of the given month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = month_start(year, month)?;
    let last = add_months_clamped(first, 1).pred_opt()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_months_clamps_into_short_months() {
        assert_eq!(add_months_clamped(d(2026, 1, 31), 1), d(2026, 2, 28));
        assert_eq!(add_months_clamped(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months_clamped(d(2026, 1, 31), 2), d(2026, 3, 31));
        assert_eq!(add_months_clamped(d(2026, 3, 31), 1), d(2026, 4, 30));
    }

    #[test]
    fn test_add_months_crosses_year_boundary() {
        assert_eq!(add_months_clamped(d(2026, 11, 15), 3), d(2027, 2, 15));
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(d(2026, 3, 1)), "2026-03");
        assert_eq!(month_key(d(2026, 12, 31)), "2026-12");
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2026, 2), Some((d(2026, 2, 1), d(2026, 2, 28))));
        assert_eq!(month_bounds(2026, 7), Some((d(2026, 7, 1), d(2026, 7, 31))));
        assert_eq!(month_bounds(2026, 13), None);
    }
}
