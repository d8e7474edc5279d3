//! # tpu-nightly CLI
//!
//! Companion binary that normalizes or reads the nightly date pinned in a
//! TPU requirements file. With `--set-date` it rewrites every
//! `.devYYYYMMDD` occurrence on torch / torchvision / torch_xla lines to
//! the given date; without it, it reports the first date it finds.
//!
//! A JSON report goes to stdout (or `--json-out`), so the output stays
//! machine-readable for CI consumers; `--out-env` additionally writes a
//! shell exports file carrying `VLLM_NIGHTLY_DATE`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use xpu_build::nightly;

/// Normalize or read the nightly date in a TPU requirements file
#[derive(Parser, Debug)]
#[command(name = "tpu-nightly")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TPU requirements file
    #[arg(long, value_name = "PATH", default_value = "requirements/tpu.txt")]
    file: PathBuf,

    /// YYYYMMDD nightly date to set across the file
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_nightly_date)]
    set_date: Option<String>,

    /// Write a shell exports file containing VLLM_NIGHTLY_DATE
    #[arg(long, value_name = "PATH")]
    out_env: Option<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    json_out: Option<PathBuf>,

    /// Do not modify the requirements file even if --set-date is given
    #[arg(long)]
    no_write: bool,
}

fn parse_nightly_date(value: &str) -> Result<String, String> {
    if nightly::is_valid_date(value) {
        Ok(value.to_string())
    } else {
        Err(format!("expected YYYYMMDD, got {:?}", value))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.file.exists() {
        anyhow::bail!("Requirements file not found: {}", cli.file.display());
    }

    let report = match &cli.set_date {
        Some(date) => nightly::set_date(&cli.file, date, !cli.no_write)?,
        None => nightly::detect(&cli.file)?,
    };

    if let Some(env_path) = &cli.out_env {
        nightly::write_env_file(env_path, &report.nightly_date)?;
    }

    let json = serde_json::to_string(&report)?;
    match &cli.json_out {
        Some(path) => std::fs::write(path, format!("{}\n", json))?,
        None => println!("{}", json),
    }

    Ok(())
}
