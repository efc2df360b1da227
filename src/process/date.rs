//! Date handling for the raw exports.
//!
//! The research office counts months from January 2000 (month zero). Output
//! rows carry both that ordinal and the canonical `YYYY-MM` date; the chart
//! JSON wants epoch milliseconds.

use chrono::{Datelike, NaiveDate};

use crate::config::{BASE_YEAR, DATA_FILE_DATE_FORMAT, SNAPSHOT_DATE_FORMAT};

/// Month ordinal → canonical `YYYY-MM` date string.
pub fn month_to_date(month: i64) -> Option<String> {
    if month < 0 {
        return None;
    }
    let year = BASE_YEAR + (month / 12) as i32;
    let month_of_year = (month % 12) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(year, month_of_year, 1)?;
    Some(date.format(DATA_FILE_DATE_FORMAT).to_string())
}

/// Normalizes the leading date column of a raw row into the month ordinal.
///
/// Accepts the ordinal itself (`"108"`), ISO `"2009-01"`, `"1/2009"`, and
/// `"Jan-2009"`; all four forms of January 2009 yield 108. Returns `None`
/// for anything else or for dates before the base year.
pub fn parse_month(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) && raw.len() <= 6 {
        return raw.parse().ok();
    }

    let (year, month) = if let Some((y, m)) = raw.split_once('-') {
        if y.len() == 4 {
            // "2009-01"
            (y.parse().ok()?, m.parse().ok()?)
        } else {
            // "Jan-2009"
            let date = NaiveDate::parse_from_str(&format!("01-{raw}"), "%d-%b-%Y").ok()?;
            (date.year(), date.month())
        }
    } else if let Some((m, y)) = raw.split_once('/') {
        // "1/2009"
        (y.parse().ok()?, m.parse().ok()?)
    } else {
        return None;
    };

    if year < BASE_YEAR || !(1..=12).contains(&month) {
        return None;
    }
    Some(i64::from(year - BASE_YEAR) * 12 + i64::from(month) - 1)
}

/// Month ordinal → full `YYYY-MM-DD` date (first of the month), the form
/// used inside the data snapshot JSON.
pub fn month_to_snapshot_date(month: i64) -> Option<String> {
    if month < 0 {
        return None;
    }
    let year = BASE_YEAR + (month / 12) as i32;
    let month_of_year = (month % 12) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(year, month_of_year, 1)?;
    Some(date.format(SNAPSHOT_DATE_FORMAT).to_string())
}

/// `YYYY-MM` → milliseconds since the Unix epoch at midnight UTC on the
/// first of that month.
pub fn epoch_ms(date: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}
