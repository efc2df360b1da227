//! The batch conversion pipeline.
//!
//! Each raw export is routed by filename to its statistic processor, pivoted
//! into the public row shape, and emitted as a CSV/JSON pair under the
//! market's folder. Files are independent: one failure is logged and counted,
//! the rest of the batch carries on.

pub mod date;
pub mod groups;
pub mod load;
pub mod map;
pub mod route;
pub mod summary;
pub mod yoy;

use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::config::{self, Config, Statistic};
use crate::emit;
use crate::error::MungeError;
use crate::snapshot;

use load::RawRow;

/// One converted artifact pair: CSV rows (header first) and the chart JSON.
#[derive(Debug)]
pub struct Converted {
    pub rows: Vec<Vec<String>>,
    pub json: Value,
}

impl Converted {
    /// An input with no data rows converts to nothing at all.
    pub fn empty() -> Self {
        Converted {
            rows: Vec::new(),
            json: Value::Null,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Unpacks a raw row into exactly `N` fields, or reports the arity mismatch.
pub(crate) fn fields<'a, const N: usize>(
    file: &str,
    row: &'a RawRow,
) -> Result<[&'a str; N], MungeError> {
    if row.fields.len() != N {
        return Err(MungeError::validation(
            file,
            row.line,
            format!("expected {N} fields, found {}", row.fields.len()),
        ));
    }
    let mut out = [""; N];
    for (slot, field) in out.iter_mut().zip(&row.fields) {
        *slot = field.as_str();
    }
    Ok(out)
}

/// Normalizes a raw date field into (month ordinal, canonical `YYYY-MM`).
pub(crate) fn month_field(
    file: &str,
    row: &RawRow,
    raw: &str,
) -> Result<(i64, String), MungeError> {
    let ordinal = date::parse_month(raw).ok_or_else(|| {
        MungeError::validation(file, row.line, format!("unparseable date '{raw}'"))
    })?;
    let date = date::month_to_date(ordinal).ok_or_else(|| {
        MungeError::validation(file, row.line, format!("date '{raw}' is out of range"))
    })?;
    Ok((ordinal, date))
}

fn dispatch(
    config: &Config,
    statistic: Statistic,
    file: &str,
    rows: &[RawRow],
) -> Result<Converted, MungeError> {
    match statistic {
        Statistic::Map => map::process_map(file, config, rows),
        Statistic::NumSummary => {
            summary::process_summary(file, rows, config::SUMMARY_NUM_OUTPUT_SCHEMA)
        }
        Statistic::VolSummary => {
            summary::process_summary(file, rows, config::SUMMARY_VOL_OUTPUT_SCHEMA)
        }
        Statistic::InquiryIndex => {
            summary::process_summary(file, rows, config::INQUIRY_INDEX_OUTPUT_SCHEMA)
        }
        Statistic::TightnessIndex => {
            summary::process_summary(file, rows, config::TIGHTNESS_INDEX_OUTPUT_SCHEMA)
        }
        Statistic::AgeVolume => groups::process_group_volume(file, rows, &config::AGE_GROUPS),
        Statistic::IncomeVolume => groups::process_group_volume(file, rows, &config::INCOME_GROUPS),
        Statistic::ScoreVolume => groups::process_group_volume(file, rows, &config::SCORE_GROUPS),
        Statistic::YoySummary => yoy::process_yoy_summary(file, rows),
        Statistic::AgeYoy => groups::process_group_yoy(file, rows, &config::AGE_GROUPS),
        Statistic::IncomeYoy => groups::process_group_yoy(file, rows, &config::INCOME_GROUPS),
        Statistic::ScoreYoy => groups::process_group_yoy(file, rows, &config::SCORE_GROUPS),
    }
}

/// Converts one routed input file and emits its CSV/JSON pair under the
/// market folder. Returns `true` when artifacts were written, `false` for an
/// input with no data rows.
#[instrument(level = "info", skip_all, fields(file = %load::file_label(path)))]
pub fn process_file(config: &Config, path: &Path, out_root: &Path) -> Result<bool, MungeError> {
    let file = load::file_label(path);
    let route = route::route_filename(config, &file)?;
    let rows = load::load_csv(path)?;
    let converted = dispatch(config, route.statistic, &file, &rows)?;

    if converted.is_empty() {
        info!("no data rows, nothing to emit");
        return Ok(false);
    }

    let csv_path = out_root.join(route.market.folder).join(&file);
    let json_path = csv_path.with_extension("json");
    emit::save_csv(&csv_path, &converted.rows)?;
    emit::save_json(&json_path, &converted.json)?;

    info!(
        rows = converted.rows.len() - 1,
        market = route.market.folder,
        "converted"
    );
    Ok(true)
}

/// Per-file outcomes of one batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Converts every `*.csv` under `input`, writing artifacts under `out_root`
/// and the optional data snapshot JSON to `snapshot_out`.
pub fn process_directory(
    config: &Config,
    input: &Path,
    out_root: &Path,
    snapshot_out: Option<&Path>,
) -> Result<RunSummary, MungeError> {
    let mut inputs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(input).map_err(|e| MungeError::io(input, e))? {
        let entry = entry.map_err(|e| MungeError::io(input, e))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();

    info!(count = inputs.len(), dir = %input.display(), "found input csv files");
    if inputs.is_empty() {
        warn!(dir = %input.display(), "no csv data files found");
        return Ok(RunSummary::default());
    }

    let mut summary = RunSummary::default();
    let mut market_files: Vec<PathBuf> = Vec::new();

    for path in inputs {
        let name = load::file_label(&path);
        if config.find_market(&name).is_some() {
            market_files.push(path);
        } else if name.contains(config::SNAPSHOT_FNAME_KEY) {
            match snapshot_out {
                Some(out) => match process_snapshot_file(&path, out) {
                    Ok(()) => summary.succeeded.push(name),
                    Err(e) => {
                        warn!(file = %name, error = %e, "snapshot processing failed");
                        summary.failed.push(name);
                    }
                },
                None => warn!(
                    file = %name,
                    "no data snapshot output path specified, skipping snapshot file"
                ),
            }
        } else {
            info!(file = %name, "ignoring file, no recognized market in name");
            summary.failed.push(name);
        }
    }

    // Files are independent, so converting them in parallel is safe.
    let outcomes: Vec<(String, Result<bool, MungeError>)> = market_files
        .par_iter()
        .map(|path| (load::file_label(path), process_file(config, path, out_root)))
        .collect();

    for (name, outcome) in outcomes {
        match outcome {
            Ok(_) => summary.succeeded.push(name),
            Err(e) => {
                warn!(file = %name, error = %e, "conversion failed");
                summary.failed.push(name);
            }
        }
    }

    info!(
        succeeded = summary.succeeded.len(),
        "processed input data files"
    );
    if !summary.failed.is_empty() {
        warn!(
            failed = summary.failed.len(),
            "unable to process some input data files"
        );
    }
    Ok(summary)
}

fn process_snapshot_file(path: &Path, out: &Path) -> Result<(), MungeError> {
    let file = load::file_label(path);
    let rows = load::load_csv(path)?;
    let published = chrono::Utc::now().date_naive();
    let document = snapshot::process_snapshot(&file, &rows, published)?;
    emit::save_json(out, &document)?;
    info!(path = %out.display(), "saved data snapshot");
    Ok(())
}
