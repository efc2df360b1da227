//! Demographic breakdown processors: volumes and year-over-year changes
//! split by borrower age, income level, or credit-score tier.

use std::collections::BTreeMap;

use crate::chart::{self, SeriesPoint};
use crate::config::{text_fix, GroupSet};
use crate::error::MungeError;

use super::load::RawRow;
use super::summary::AdjustedPair;
use super::{fields, month_field, Converted};

/// Grouped volume: input rows `(month, value, group, adjustment)` pivot into
/// one row per month and group, with the agency text fixes applied to the
/// group label.
pub fn process_group_volume(
    file: &str,
    rows: &[RawRow],
    group_set: &GroupSet,
) -> Result<Converted, MungeError> {
    let mut months: BTreeMap<i64, (String, BTreeMap<String, AdjustedPair>)> = BTreeMap::new();

    for row in rows {
        let [month, value, group, adjustment] = fields::<4>(file, row)?;
        let (ordinal, date) = month_field(file, row, month)?;
        let (_, groups) = months
            .entry(ordinal)
            .or_insert_with(|| (date, BTreeMap::new()));
        let pair = groups.entry(text_fix(group).to_string()).or_default();
        pair.set(file, row.line, adjustment, value)?;
    }

    if months.is_empty() {
        return Ok(Converted::empty());
    }

    let schema = vec![
        "month".to_string(),
        "date".to_string(),
        "vol".to_string(),
        "vol_unadj".to_string(),
        format!("{}_group", group_set.kind),
    ];

    let mut out_rows = vec![schema];
    let mut points = Vec::new();
    for (ordinal, (date, groups)) in &months {
        for (label, pair) in groups {
            out_rows.push(vec![
                ordinal.to_string(),
                date.clone(),
                pair.adjusted.clone().unwrap_or_default(),
                pair.unadjusted.clone().unwrap_or_default(),
                label.clone(),
            ]);
            points.push((
                label.clone(),
                SeriesPoint {
                    date: date.clone(),
                    adjusted: pair.adjusted.clone(),
                    unadjusted: pair.unadjusted.clone(),
                },
            ));
        }
    }

    Ok(Converted {
        rows: out_rows,
        json: chart::grouped_line_chart(&points),
    })
}

/// Grouped year-over-year change: input rows `(month, value, group)` pivot
/// into one wide row per month with a column per roster member. A group
/// label outside the roster is a validation error.
pub fn process_group_yoy(
    file: &str,
    rows: &[RawRow],
    group_set: &GroupSet,
) -> Result<Converted, MungeError> {
    let member_count = group_set.members_in.len();
    let mut months: BTreeMap<i64, (String, Vec<Option<String>>)> = BTreeMap::new();

    for row in rows {
        let [month, value, group] = fields::<3>(file, row)?;
        let (ordinal, date) = month_field(file, row, month)?;
        let idx = group_set
            .members_in
            .iter()
            .position(|m| *m == group)
            .ok_or_else(|| {
                MungeError::validation(file, row.line, format!("illegal group name '{group}'"))
            })?;
        let (_, values) = months
            .entry(ordinal)
            .or_insert_with(|| (date, vec![None; member_count]));
        values[idx] = Some(value.to_string());
    }

    if months.is_empty() {
        return Ok(Converted::empty());
    }

    let mut schema = vec!["month".to_string(), "date".to_string()];
    schema.extend(group_set.members_col.iter().map(|m| format!("{m}_yoy")));

    let mut out_rows = vec![schema];
    let mut chart_rows = Vec::with_capacity(months.len());
    for (ordinal, (date, values)) in &months {
        let mut out_row = vec![ordinal.to_string(), date.clone()];
        out_row.extend(values.iter().map(|v| v.clone().unwrap_or_default()));
        out_rows.push(out_row);
        chart_rows.push((date.clone(), values.clone()));
    }

    Ok(Converted {
        rows: out_rows,
        json: chart::grouped_bar_chart(&chart_rows, group_set.members_json),
    })
}
