//! Market-wide year-over-year summary processor.
//!
//! Input rows are `(month, value, series)` where the series label names
//! either the loan-count or dollar-volume series. Inquiry and tightness
//! index rows ride along in these exports and are ignored here; they have
//! their own files.

use std::collections::BTreeMap;

use crate::chart;
use crate::config::YOY_SUMMARY_OUTPUT_SCHEMA;
use crate::error::MungeError;

use super::load::RawRow;
use super::{fields, month_field, Converted};

#[derive(Debug, Default, Clone)]
struct YoyPair {
    num: Option<String>,
    vol: Option<String>,
}

pub fn process_yoy_summary(file: &str, rows: &[RawRow]) -> Result<Converted, MungeError> {
    let mut months: BTreeMap<i64, (String, YoyPair)> = BTreeMap::new();

    for row in rows {
        let [month, value, series] = fields::<3>(file, row)?;
        let (ordinal, date) = month_field(file, row, month)?;
        let (_, pair) = months
            .entry(ordinal)
            .or_insert_with(|| (date, YoyPair::default()));

        let label = series.to_lowercase();
        if label.contains("number") {
            pair.num = Some(value.to_string());
        } else if label.contains("volume") {
            pair.vol = Some(value.to_string());
        } else if label.contains("inquiry") || label.contains("tightness") {
            // index series are published from their own files
        } else {
            return Err(MungeError::validation(
                file,
                row.line,
                format!("unrecognized year-over-year series '{series}'"),
            ));
        }
    }

    if months.is_empty() {
        return Ok(Converted::empty());
    }

    let mut out_rows = vec![YOY_SUMMARY_OUTPUT_SCHEMA
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];
    let mut points = Vec::with_capacity(months.len());
    for (ordinal, (date, pair)) in &months {
        out_rows.push(vec![
            ordinal.to_string(),
            date.clone(),
            pair.num.clone().unwrap_or_default(),
            pair.vol.clone().unwrap_or_default(),
        ]);
        points.push((date.clone(), pair.num.clone(), pair.vol.clone()));
    }

    Ok(Converted {
        rows: out_rows,
        json: chart::bar_chart(&points),
    })
}
