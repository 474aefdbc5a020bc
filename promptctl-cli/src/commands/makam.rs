//! `promptctl makam-report`: makam to K-signature distribution over an ABC corpus.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use promptctl_core::{build_report, write_report};

#[derive(Parser, Debug)]
pub struct MakamReportArgs {
    /// ABC corpus to scan
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the JSON report
    #[arg(long)]
    pub output_json: PathBuf,
}

pub fn run_makam_report(args: MakamReportArgs) -> Result<()> {
    let report = build_report(&args.input)
        .with_context(|| format!("Failed to build makam report from {}", args.input.display()))?;
    write_report(&report, &args.output_json)?;
    Ok(())
}
