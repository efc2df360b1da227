//! Monthly summary processor: loan counts, dollar volumes, and the inquiry
//! and credit tightness indexes all share this shape.
//!
//! Input rows are `(month, value, adjustment)` with one row per adjustment
//! flavor; they pivot into one output row per month carrying the seasonally
//! adjusted and unadjusted values side by side.

use std::collections::BTreeMap;

use crate::chart::{self, SeriesPoint};
use crate::error::MungeError;

use super::load::RawRow;
use super::{fields, month_field, Converted};

#[derive(Debug, Default, Clone)]
pub(crate) struct AdjustedPair {
    pub adjusted: Option<String>,
    pub unadjusted: Option<String>,
}

impl AdjustedPair {
    /// Files the value under the flavor named by the adjustment label.
    pub fn set(
        &mut self,
        file: &str,
        line: u64,
        adjustment: &str,
        value: &str,
    ) -> Result<(), MungeError> {
        let label = adjustment.to_lowercase();
        if label.contains("unadjust") {
            self.unadjusted = Some(value.to_string());
        } else if label.contains("seasonal") {
            self.adjusted = Some(value.to_string());
        } else {
            return Err(MungeError::validation(
                file,
                line,
                format!("row does not specify seasonal adjustment: '{adjustment}'"),
            ));
        }
        Ok(())
    }
}

pub fn process_summary(
    file: &str,
    rows: &[RawRow],
    schema: &[&str],
) -> Result<Converted, MungeError> {
    let mut months: BTreeMap<i64, (String, AdjustedPair)> = BTreeMap::new();

    for row in rows {
        let [month, value, adjustment] = fields::<3>(file, row)?;
        let (ordinal, date) = month_field(file, row, month)?;
        let (_, pair) = months
            .entry(ordinal)
            .or_insert_with(|| (date, AdjustedPair::default()));
        pair.set(file, row.line, adjustment, value)?;
    }

    if months.is_empty() {
        return Ok(Converted::empty());
    }

    let mut out_rows = vec![schema.iter().map(|s| s.to_string()).collect::<Vec<_>>()];
    let mut points = Vec::with_capacity(months.len());
    for (ordinal, (date, pair)) in &months {
        out_rows.push(vec![
            ordinal.to_string(),
            date.clone(),
            pair.adjusted.clone().unwrap_or_default(),
            pair.unadjusted.clone().unwrap_or_default(),
        ]);
        points.push(SeriesPoint {
            date: date.clone(),
            adjusted: pair.adjusted.clone(),
            unadjusted: pair.unadjusted.clone(),
        });
    }

    Ok(Converted {
        rows: out_rows,
        json: chart::line_chart(&points),
    })
}
