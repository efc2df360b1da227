//! Data snapshot processing.
//!
//! The snapshot export carries the headline figures for every market in one
//! file: `(month, market, var_name, value, value_yoy)` rows. It is rendered
//! into the human-readable snippets shown above each chart, as a single JSON
//! document rather than per-market CSV/JSON pairs.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::config::SNAPSHOT_DATE_FORMAT;
use crate::error::MungeError;
use crate::process::date::{month_to_snapshot_date, parse_month};
use crate::process::fields;
use crate::process::load::RawRow;

const NUM_NAMES: [&str; 7] = [
    "",
    "",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Inserts thousands separators into an already-formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac) = match rest.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Renders a number with a million/billion style modifier, e.g. 1_100_000 →
/// "1.1 million". Below one million the number is written out with thousands
/// separators; `whole_units_only` drops the fractional part there.
pub fn human_numbers(num: f64, decimal_places: usize, whole_units_only: bool) -> String {
    let magnitude = if num == 0.0 {
        0
    } else {
        (num.abs().log10() / 3.0).floor() as i64
    };
    let idx = magnitude.clamp(0, NUM_NAMES.len() as i64 - 1) as usize;

    if idx < 2 {
        if whole_units_only {
            group_thousands(&format!("{num:.0}"))
        } else {
            group_thousands(&format!("{num:.decimal_places$}"))
        }
    } else {
        let scaled = num / 10f64.powi(3 * idx as i32);
        format!(
            "{} {}",
            group_thousands(&format!("{scaled:.decimal_places$}")),
            NUM_NAMES[idx]
        )
    }
}

/// "3.4% increase" / "3.4% decrease" wording for a year-over-year delta.
fn percent_change(yoy: f64) -> String {
    let descriptor = if yoy > 0.0 { "increase" } else { "decrease" };
    format!("{:.1}% {}", yoy.abs(), descriptor)
}

/// Builds the snapshot JSON document from the raw rows.
pub fn process_snapshot(
    file: &str,
    rows: &[RawRow],
    published: NaiveDate,
) -> Result<Value, MungeError> {
    let mut markets: BTreeMap<String, Map<String, Value>> = BTreeMap::new();

    for row in rows {
        let [month, market, var_name, value, value_yoy] = fields::<5>(file, row)?;

        let ordinal = parse_month(month).ok_or_else(|| {
            MungeError::validation(file, row.line, format!("unparseable date '{month}'"))
        })?;
        let data_month = month_to_snapshot_date(ordinal).ok_or_else(|| {
            MungeError::validation(file, row.line, format!("date '{month}' is out of range"))
        })?;

        let parse_number = |raw: &str| {
            raw.parse::<f64>().map_err(|_| {
                MungeError::validation(file, row.line, format!("non-numeric value '{raw}'"))
            })
        };

        let entry = markets.entry(market.to_string()).or_insert_with(|| {
            let mut info = Map::new();
            info.insert("market_key".to_string(), json!(market));
            info
        });

        let var = var_name.to_lowercase();
        if var.contains("originations") {
            let originations = human_numbers(parse_number(value)?, 1, true);
            let change = percent_change(parse_number(value_yoy)?);
            entry.insert("data_month".to_string(), json!(data_month));
            entry.insert("num_originations".to_string(), json!(originations));
            entry.insert("year_over_year_change".to_string(), json!(change));
        } else if var.contains("volume") {
            // volume month is the origination month
            let volume = format!("${}", human_numbers(parse_number(value)?, 1, false));
            entry.insert("value_originations".to_string(), json!(volume));
        } else if var.contains("inquiry") {
            let change = percent_change(parse_number(value_yoy)?);
            entry.insert("inquiry_yoy_change".to_string(), json!(change));
            entry.insert("inquiry_month".to_string(), json!(data_month));
        } else if var.contains("tightness") {
            let change = percent_change(parse_number(value_yoy)?);
            entry.insert("tightness_yoy_change".to_string(), json!(change));
            entry.insert("tightness_month".to_string(), json!(data_month));
        } else {
            return Err(MungeError::validation(
                file,
                row.line,
                format!("unknown snapshot variable '{var_name}'"),
            ));
        }
    }

    let markets: Vec<Value> = markets.into_values().map(Value::Object).collect();
    Ok(json!({
        "date_published": published.format(SNAPSHOT_DATE_FORMAT).to_string(),
        "markets": markets,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(line: u64, fields: &[&str]) -> RawRow {
        RawRow {
            line,
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn humanizes_numbers() {
        assert_eq!(human_numbers(1_100_000.0, 1, false), "1.1 million");
        assert_eq!(human_numbers(2_400_000_000.0, 1, false), "2.4 billion");
        assert_eq!(human_numbers(67.012, 1, true), "67");
        assert_eq!(human_numbers(123_456.0, 1, true), "123,456");
        assert_eq!(human_numbers(0.0, 1, true), "0");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
        assert_eq!(group_thousands("12"), "12");
    }

    #[test]
    fn percent_change_wording() {
        assert_eq!(percent_change(3.42), "3.4% increase");
        assert_eq!(percent_change(-0.5), "0.5% decrease");
    }

    #[test]
    fn builds_market_entries() {
        let published = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        let rows = vec![
            raw(2, &["195", "AUT", "Originations", "2100000", "3.4"]),
            raw(3, &["195", "AUT", "Dollar Volume", "49000000000", "-1.2"]),
            raw(4, &["196", "AUT", "Inquiry Index", "1.02", "2.0"]),
        ];
        let snapshot = process_snapshot("data_snapshot.csv", &rows, published).unwrap();

        assert_eq!(snapshot["date_published"], "2017-06-01");
        let market = &snapshot["markets"][0];
        assert_eq!(market["market_key"], "AUT");
        assert_eq!(market["data_month"], "2016-04-01");
        assert_eq!(market["num_originations"], "2.1 million");
        assert_eq!(market["year_over_year_change"], "3.4% increase");
        assert_eq!(market["value_originations"], "$49.0 billion");
        assert_eq!(market["inquiry_yoy_change"], "2.0% increase");
        assert_eq!(market["inquiry_month"], "2016-05-01");
    }

    #[test]
    fn unknown_variable_is_validation_error() {
        let published = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        let rows = vec![raw(2, &["195", "AUT", "Mystery Metric", "1", "2"])];
        let err = process_snapshot("data_snapshot.csv", &rows, published).unwrap_err();
        assert!(matches!(err, MungeError::Validation { row: 2, .. }), "{err}");
    }
}
