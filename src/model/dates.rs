// File: ./src/model/dates.rs
//! Lenient date parsing and day arithmetic.
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Day zero for the absolute day-count features.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(d) => d,
    None => panic!("invalid epoch"),
};

/// Years below this came from a truncated year field (`25` read by `%Y`).
const MIN_YEAR: i32 = 1000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

// Two-digit years first: `%y` refuses four digits, while `%Y` happily takes two
const MONTH_FIRST: &[&str] = &[
    "%m/%d/%y", "%m-%d-%y", "%m.%d.%y", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y",
];
const DAY_FIRST: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
];

const TEXTUAL_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d-%b-%Y",
    "%Y%m%d",
];

/// Parser for the date columns. Accepts the common spreadsheet exports
/// (ISO, US/EU numeric, textual months) plus any caller supplied formats.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    extra_formats: Vec<String>,
    day_first: bool,
}

impl DateParser {
    pub fn new(extra_formats: Vec<String>, day_first: bool) -> Self {
        Self {
            extra_formats,
            day_first,
        }
    }

    /// Parses a cell into a timestamp. Date-only values land on midnight.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let val = raw.trim();
        if val.is_empty() {
            return None;
        }

        if let Some(dt) = self
            .extra_formats
            .iter()
            .find_map(|fmt| parse_with(val, fmt))
        {
            return Some(dt);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(val)
            && plausible(&dt.naive_local())
        {
            return Some(dt.naive_local());
        }

        let numeric = if self.day_first { DAY_FIRST } else { MONTH_FIRST };
        DATETIME_FORMATS
            .iter()
            .chain(ISO_DATE_FORMATS)
            .chain(numeric)
            .chain(TEXTUAL_FORMATS)
            .find_map(|fmt| parse_with(val, fmt))
    }
}

fn plausible(dt: &NaiveDateTime) -> bool {
    dt.year() >= MIN_YEAR
}

fn parse_with(val: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(val, fmt)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(val, fmt)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .filter(plausible)
}

/// Whole days from `from` to `to`, negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn days_since_epoch(date: NaiveDate) -> i64 {
    days_between(EPOCH, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_and_datetime() {
        let p = DateParser::default();
        assert_eq!(p.parse("2024-06-01").unwrap().date(), ymd(2024, 6, 1));
        let dt = p.parse("2024-06-01 13:45:00").unwrap();
        assert_eq!(dt.date(), ymd(2024, 6, 1));
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(13, 45, 0).unwrap());
        assert_eq!(
            p.parse("2024-06-01T08:00:00+02:00").unwrap().date(),
            ymd(2024, 6, 1)
        );
    }

    #[test]
    fn numeric_dates_follow_day_first_setting() {
        let us = DateParser::default();
        assert_eq!(us.parse("01/02/2024").unwrap().date(), ymd(2024, 1, 2));

        let eu = DateParser::new(Vec::new(), true);
        assert_eq!(eu.parse("01/02/2024").unwrap().date(), ymd(2024, 2, 1));
        // Unambiguous only one way round
        assert_eq!(eu.parse("2024/02/01").unwrap().date(), ymd(2024, 2, 1));
    }

    #[test]
    fn textual_months() {
        let p = DateParser::default();
        assert_eq!(p.parse("1 June 2024").unwrap().date(), ymd(2024, 6, 1));
        assert_eq!(p.parse("Jun 1, 2024").unwrap().date(), ymd(2024, 6, 1));
    }

    #[test]
    fn extra_formats_are_tried_first() {
        let p = DateParser::new(vec!["%d|%m|%Y".to_string()], false);
        assert_eq!(p.parse("05|03|2024").unwrap().date(), ymd(2024, 3, 5));
    }

    #[test]
    fn rejects_garbage() {
        let p = DateParser::default();
        assert!(p.parse("").is_none());
        assert!(p.parse("   ").is_none());
        assert!(p.parse("not a date").is_none());
        assert!(p.parse("2024-13-01").is_none());
        assert!(p.parse("2023-02-29").is_none());
    }

    #[test]
    fn two_digit_years_land_in_this_century() {
        let p = DateParser::default();
        assert_eq!(p.parse("12/31/25").unwrap().date(), ymd(2025, 12, 31));
        assert_eq!(p.parse("01/02/24").unwrap().date(), ymd(2024, 1, 2));
        assert_eq!(p.parse("12/31/2025").unwrap().date(), ymd(2025, 12, 31));

        let eu = DateParser::new(Vec::new(), true);
        assert_eq!(eu.parse("01/02/24").unwrap().date(), ymd(2024, 2, 1));
        assert_eq!(eu.parse("31.12.25").unwrap().date(), ymd(2025, 12, 31));
    }

    #[test]
    fn truncated_years_are_not_accepted() {
        let p = DateParser::default();
        assert!(p.parse("0025-12-31").is_none());
        assert!(p.parse("25-12-31").is_none());
        // Same rule for caller supplied formats
        let custom = DateParser::new(vec!["%Y|%m|%d".to_string()], false);
        assert!(custom.parse("25|12|31").is_none());
    }

    #[test]
    fn fractional_seconds() {
        let p = DateParser::default();
        let dt = p.parse("2024-06-01 00:00:00.000").unwrap();
        assert_eq!(dt, ymd(2024, 6, 1).and_hms_opt(0, 0, 0).unwrap());
        let dt = p.parse("2024-06-01T08:30:15.250").unwrap();
        assert_eq!(dt, ymd(2024, 6, 1).and_hms_milli_opt(8, 30, 15, 250).unwrap());
    }

    #[test]
    fn epoch_day_counts() {
        assert_eq!(days_since_epoch(EPOCH), 0);
        assert_eq!(days_since_epoch(ymd(1970, 1, 31)), 30);
        assert_eq!(days_since_epoch(ymd(1969, 12, 31)), -1);
        assert_eq!(days_since_epoch(ymd(2024, 1, 1)), 19723);
    }
}
