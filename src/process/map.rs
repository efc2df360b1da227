//! State-level map processor.
//!
//! Input rows are `(state_fips, value)`; output adds the postal abbreviation
//! from the static FIPS table. Row order follows the input file.

use crate::chart;
use crate::config::{Config, MAP_OUTPUT_SCHEMA};
use crate::error::MungeError;

use super::load::RawRow;
use super::{fields, Converted};

pub fn process_map(file: &str, config: &Config, rows: &[RawRow]) -> Result<Converted, MungeError> {
    if rows.is_empty() {
        return Ok(Converted::empty());
    }

    let mut out_rows = vec![MAP_OUTPUT_SCHEMA
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];
    let mut tiles = Vec::with_capacity(rows.len());

    for row in rows {
        let [state, value] = fields::<2>(file, row)?;
        let fips: u32 = state.parse().map_err(|_| {
            MungeError::validation(file, row.line, format!("non-numeric FIPS code '{state}'"))
        })?;
        let abbr = config.state_abbr(fips).ok_or_else(|| {
            MungeError::validation(file, row.line, format!("unsupported FIPS code '{fips}'"))
        })?;

        out_rows.push(vec![state.to_string(), abbr.to_string(), value.to_string()]);
        tiles.push((abbr.to_string(), value.to_string()));
    }

    Ok(Converted {
        rows: out_rows,
        json: chart::tile_map(&tiles),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(line: u64, fields: &[&str]) -> RawRow {
        RawRow {
            line,
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn adds_state_abbreviations() {
        let config = Config::new();
        let rows = vec![raw(2, &["53", "0.1234"]), raw(3, &["41", "NA"])];
        let converted = process_map("map_data_AUT.csv", &config, &rows).unwrap();

        assert_eq!(converted.rows[0], vec!["fips_code", "state_abbr", "value"]);
        assert_eq!(converted.rows[1], vec!["53", "WA", "0.1234"]);
        assert_eq!(converted.rows[2], vec!["41", "OR", "NA"]);
        assert_eq!(
            converted.json[0],
            json!({ "name": "WA", "value": "12.34" })
        );
        assert_eq!(converted.json[1], json!({ "name": "OR", "value": "NA" }));
    }

    #[test]
    fn unsupported_fips_is_validation_error() {
        let config = Config::new();
        let rows = vec![raw(2, &["3", "0.5"])];
        let err = process_map("map_data_AUT.csv", &config, &rows).unwrap_err();
        assert!(matches!(err, MungeError::Validation { row: 2, .. }), "{err}");
    }

    #[test]
    fn non_numeric_fips_is_validation_error() {
        let config = Config::new();
        let rows = vec![raw(2, &["WA", "0.5"])];
        assert!(process_map("map_data_AUT.csv", &config, &rows).is_err());
    }
}
