//! `promptctl extract`: pull prompt blocks out of chat exports.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use promptctl_core::pipeline::{extract_prompts, ExtractOptions};
use promptctl_core::{PromptKind, PromptctlConfig};
use tracing::debug;

use crate::ui;

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Directory holding chat exports (default: docs/qa/chat-exports)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory that receives one file per prompt (default: docs/qa/chat-exports/prompts)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Which blocks to keep
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Report what would be written without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// Every extracted block
    All,
    /// Only structured task specs (role declaration plus objective/deliverables)
    Official,
}

impl From<KindArg> for PromptKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::All => PromptKind::All,
            KindArg::Official => PromptKind::Official,
        }
    }
}

/// CLI flags override the config file, which overrides built-in defaults.
fn resolve_options(args: ExtractArgs, config: PromptctlConfig) -> ExtractOptions {
    ExtractOptions {
        input_dir: args.input_dir.unwrap_or_else(|| config.input_dir()),
        output_dir: args.output_dir.unwrap_or_else(|| config.output_dir()),
        kind: args.kind.map(PromptKind::from).unwrap_or_else(|| config.kind()),
        rules: config.rules,
        dry_run: args.dry_run,
        show_progress: !ui::is_quiet(),
    }
}

pub fn run_extract(args: ExtractArgs, config: PromptctlConfig) -> Result<()> {
    let opts = resolve_options(args, config);
    debug!(
        input = %opts.input_dir.display(),
        output = %opts.output_dir.display(),
        kind = ?opts.kind,
        dry_run = opts.dry_run,
        "starting extraction"
    );

    let summary = extract_prompts(&opts)?;

    if opts.dry_run {
        for path in &summary.written {
            println!("{}", path.display());
        }
    }
    println!("Extracted prompts: {}", summary.prompts_written);
    Ok(())
}
