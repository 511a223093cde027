//! "d M y" date extraction and normalization.
//!
//! `d` is a day (1-31, optional leading zero, optional `st|nd|rd|th`
//! suffix), `M` is a long or short month name, `y` is any four-digit
//! year. `extract_d_m_y` finds the first such substring in free text;
//! `normalize_d_m_y` turns one into `YYYY-MM-DD`.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn month_number(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "january" | "jan" => Some("01"),
        "february" | "feb" => Some("02"),
        "march" | "mar" => Some("03"),
        "april" | "apr" => Some("04"),
        "may" => Some("05"),
        "june" | "jun" => Some("06"),
        "july" | "jul" => Some("07"),
        "august" | "aug" => Some("08"),
        "september" | "sep" => Some("09"),
        "october" | "oct" => Some("10"),
        "november" | "nov" => Some("11"),
        "december" | "dec" => Some("12"),
        _ => None,
    }
}

fn d_m_y_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(0?[1-9]|1[0-9]|2[0-9]|3[0-1])(st|nd|rd|th)?\s+(January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+([0-9]{4})\b",
        )
        .expect("valid date regex")
    })
}

/// Find every `"d M y"` substring in `text`, e.g. `"18th October 2023"`.
#[must_use]
pub fn extract_d_m_y(text: &str) -> Vec<String> {
    d_m_y_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The first `"d M y"` match in `text`, if any.
#[must_use]
pub fn first_d_m_y(text: &str) -> Option<String> {
    extract_d_m_y(text).into_iter().next()
}

/// Normalize a `"d M y"` string (e.g. `"1st Feb 2010"`) into `YYYY-MM-DD`.
/// Returns `None` if the string is malformed or not a valid calendar
/// date.
#[must_use]
pub fn normalize_d_m_y(entry: &str) -> Option<String> {
    let caps = d_m_y_regex().captures(entry)?;
    let day_raw = &caps[1];
    let month_name = &caps[3];
    let year = &caps[4];

    let day = if day_raw.len() == 1 {
        format!("0{day_raw}")
    } else {
        day_raw.to_string()
    };
    let month = month_number(month_name)?;
    let normalized = format!("{year}-{month}-{day}");

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()?;
    Some(normalized)
}

/// The whole-day span between two normalized (`YYYY-MM-DD`) dates,
/// formatted as a plain integer string, or `None` if either date is
/// missing or unparseable.
#[must_use]
pub fn duration_days(received: Option<&str>, published: Option<&str>) -> Option<String> {
    let received = NaiveDate::parse_from_str(received?, "%Y-%m-%d").ok()?;
    let published = NaiveDate::parse_from_str(published?, "%Y-%m-%d").ok()?;
    Some((published - received).num_days().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ordinal_suffix_and_short_month() {
        let found = first_d_m_y("Received: 18th October 2023, Accepted later").unwrap();
        assert_eq!(found, "18th October 2023");
    }

    #[test]
    fn normalizes_single_digit_day() {
        assert_eq!(normalize_d_m_y("1st Feb 2010").as_deref(), Some("2010-02-01"));
        assert_eq!(normalize_d_m_y("25 Dec 1990").as_deref(), Some("1990-12-25"));
    }

    #[test]
    fn rejects_invalid_calendar_date() {
        assert_eq!(normalize_d_m_y("31 February 9999"), None);
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(first_d_m_y("no dates here"), None);
        assert_eq!(normalize_d_m_y("garbage"), None);
    }

    #[test]
    fn duration_is_whole_days_between_dates() {
        assert_eq!(
            duration_days(Some("2020-01-01"), Some("2020-03-01")),
            Some("60".to_string())
        );
        assert_eq!(duration_days(Some("2020-01-01"), None), None);
    }
}
