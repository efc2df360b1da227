use anyhow::{Context, Result};
use cctmunger::{config::Config, process};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cctmunger")]
#[command(about = "Munges Office of Research credit-trend exports into chart-ready CSV/JSON")]
struct Args {
    /// Directory containing the raw input csv files
    #[arg(short, long, default_value = "data")]
    input_path: PathBuf,

    /// Root directory for processed output, one folder per market
    #[arg(short, long, default_value = "processed_data")]
    output_path: PathBuf,

    /// Where to save the data snapshot JSON; snapshot files are skipped
    /// when this is not given
    #[arg(short = 'd', long)]
    data_snapshot_path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let args = Args::parse();
    let config = Config::new();

    let summary = process::process_directory(
        &config,
        &args.input_path,
        &args.output_path,
        args.data_snapshot_path.as_deref(),
    )
    .with_context(|| format!("processing {}", args.input_path.display()))?;

    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "run complete"
    );
    Ok(())
}
