use chrono::{Datelike, NaiveDate};

/// Format a date as the compact `YYYYMMDD` form used in endpoint paths.
/// Local calendar fields only, no timezone conversion.
pub fn compact_date(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Strip every non-digit character from a string.
/// Used to derive the numeric account id from an alphanumeric identifier
/// (e.g. "S1234AB" -> "1234").
pub fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}
