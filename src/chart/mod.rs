//! Chart-ready JSON shapes.
//!
//! These layouts are an external contract with the public chart organisms:
//! time series are `[epoch_ms, value]` pairs, grouped charts key series by
//! their public labels. serde_json's map is BTree-backed, so keys serialize
//! sorted, matching the published files.
//!
//! Values that do not parse as numbers (`NA`, blanks, missing pivot cells)
//! are dropped from the JSON only; the CSV keeps them verbatim.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::process::date::epoch_ms;

/// One month of an adjusted/unadjusted series, dated `YYYY-MM`.
#[derive(Debug, Clone)]
pub struct SeriesPoint {
    pub date: String,
    pub adjusted: Option<String>,
    pub unadjusted: Option<String>,
}

fn push_value(series: &mut Vec<Value>, ms: i64, raw: Option<&str>) {
    match raw.map(|v| v.parse::<f64>()) {
        Some(Ok(v)) => series.push(json!([ms, v])),
        Some(Err(_)) => debug!(?raw, "discarding non-numeric chart value"),
        None => debug!("discarding missing chart value"),
    }
}

fn point_ms(date: &str) -> Option<i64> {
    let ms = epoch_ms(date);
    if ms.is_none() {
        debug!(date, "discarding point with unparseable date");
    }
    ms
}

/// Line chart: `{"adjusted": [[ms, v]...], "unadjusted": [[ms, v]...]}`.
pub fn line_chart(points: &[SeriesPoint]) -> Value {
    let mut adjusted = Vec::new();
    let mut unadjusted = Vec::new();
    for point in points {
        let Some(ms) = point_ms(&point.date) else {
            continue;
        };
        push_value(&mut adjusted, ms, point.adjusted.as_deref());
        push_value(&mut unadjusted, ms, point.unadjusted.as_deref());
    }
    json!({ "adjusted": adjusted, "unadjusted": unadjusted })
}

/// Grouped line chart: one `{"adjusted", "unadjusted"}` pair per group
/// label. Bare age-range labels lose their "Age " prefix in the JSON.
pub fn grouped_line_chart(points: &[(String, SeriesPoint)]) -> Value {
    let mut groups: Map<String, Value> = Map::new();
    for (label, point) in points {
        let label = label
            .strip_prefix("Age ")
            .or_else(|| label.strip_prefix("age "))
            .unwrap_or(label.as_str());
        let entry = groups
            .entry(label.to_string())
            .or_insert_with(|| json!({ "adjusted": [], "unadjusted": [] }));

        let Some(ms) = point_ms(&point.date) else {
            continue;
        };
        for (key, raw) in [
            ("adjusted", point.adjusted.as_deref()),
            ("unadjusted", point.unadjusted.as_deref()),
        ] {
            if let Some(Value::Array(series)) = entry.get_mut(key) {
                push_value(series, ms, raw);
            }
        }
    }
    Value::Object(groups)
}

/// Year-over-year bar chart keyed by the two public series names.
pub fn bar_chart(points: &[(String, Option<String>, Option<String>)]) -> Value {
    let mut num = Vec::new();
    let mut vol = Vec::new();
    for (date, yoy_num, yoy_vol) in points {
        let Some(ms) = point_ms(date) else {
            continue;
        };
        push_value(&mut num, ms, yoy_num.as_deref());
        push_value(&mut vol, ms, yoy_vol.as_deref());
    }
    json!({ "Number of Loans": num, "Dollar Volume": vol })
}

/// Grouped bar chart: one series per roster member, keyed by the public
/// member labels. Each row carries the member values in roster order.
pub fn grouped_bar_chart(rows: &[(String, Vec<Option<String>>)], labels: &[&str]) -> Value {
    let mut series: Vec<Vec<Value>> = vec![Vec::new(); labels.len()];
    for (date, values) in rows {
        let Some(ms) = point_ms(date) else {
            continue;
        };
        for (idx, raw) in values.iter().enumerate().take(labels.len()) {
            push_value(&mut series[idx], ms, raw.as_deref());
        }
    }

    let mut out = Map::new();
    for (label, points) in labels.iter().zip(series) {
        out.insert(label.to_string(), Value::Array(points));
    }
    Value::Object(out)
}

#[derive(Debug, Serialize)]
struct Tile<'a> {
    name: &'a str,
    value: String,
}

/// Tile map: `[{"name": abbr, "value": "pp.pp"}]`, value scaled to percent
/// with two decimals. Non-numeric values (`NA`) pass through untouched.
pub fn tile_map(rows: &[(String, String)]) -> Value {
    let tiles: Vec<Tile<'_>> = rows
        .iter()
        .map(|(abbr, value)| Tile {
            name: abbr,
            value: match value.parse::<f64>() {
                Ok(v) => format!("{:.2}", v * 100.0),
                Err(_) => value.clone(),
            },
        })
        .collect();
    serde_json::to_value(tiles).unwrap_or(Value::Null)
}
