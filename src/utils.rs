use chrono::{Datelike, Days, NaiveDate};

/// Truncate a raw date string to its 10-character ISO prefix and parse it.
/// Time suffixes are ignored; anything unparseable yields `None`.
pub fn parse_iso_prefix(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The Monday on or before the given date (ISO week start).
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back))
        .expect("week start within calendar range")
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// The (year, month) pair of the calendar month preceding the given date's
/// month, wrapping December -> January across the year boundary.
pub fn prev_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

/// Whole days elapsed from `from` to `to`; negative when `from` is later.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_iso_prefix() {
        assert_eq!(parse_iso_prefix("2024-03-15"), Some(d(2024, 3, 15)));
        assert_eq!(
            parse_iso_prefix("2024-03-15T08:30:00Z"),
            Some(d(2024, 3, 15))
        );
        assert_eq!(parse_iso_prefix("2024-3-5"), None);
        assert_eq!(parse_iso_prefix(""), None);
        assert_eq!(parse_iso_prefix("not a date"), None);
    }

    #[test]
    fn test_monday_of() {
        // 2024-03-06 is a Wednesday
        assert_eq!(monday_of(d(2024, 3, 6)), d(2024, 3, 4));
        assert_eq!(monday_of(d(2024, 3, 4)), d(2024, 3, 4));
        // Sunday belongs to the week starting the preceding Monday
        assert_eq!(monday_of(d(2024, 3, 10)), d(2024, 3, 4));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2023, 2), d(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 2), d(2024, 2, 29));
        assert_eq!(last_day_of_month(2024, 12), d(2024, 12, 31));
    }

    #[test]
    fn test_prev_month_wraps_year() {
        assert_eq!(prev_month(d(2024, 1, 15)), (2023, 12));
        assert_eq!(prev_month(d(2024, 7, 1)), (2024, 6));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d(2024, 3, 1), d(2024, 3, 11)), 10);
        assert_eq!(days_between(d(2024, 3, 11), d(2024, 3, 1)), -10);
    }
}
