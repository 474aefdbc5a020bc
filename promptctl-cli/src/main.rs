//! promptctl CLI - prompt recovery from chat exports
//!
//! Subcommands:
//! - `extract`: walk an export tree and write one file per prompt block
//! - `makam-report`: makam/K-signature distribution over an ABC corpus
//! - `completions`: shell completion scripts

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use promptctl_core::{PromptError, PromptctlConfig};

mod commands;
mod tracing_setup;
mod ui;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "promptctl",
    author,
    version,
    about = "Extract user prompts from web chat and CLI assistant exports",
    long_about = "Recover user-authored prompt blocks from HTML chat exports and plain-text \
                  assistant transcripts, writing each unique block to its own file grouped by date."
)]
struct Cli {
    /// Suppress progress spinners and info logs (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: $PROMPTCTL_CONFIG, then ./promptctl.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract prompt blocks from chat exports into individual files
    Extract(commands::extract::ExtractArgs),
    /// Build the makam to K-signature JSON report for an ABC corpus
    MakamReport(commands::makam::MakamReportArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    ui::init_quiet_mode(cli.quiet);
    tracing_setup::init_tracing(&TracingConfig {
        debug: cli.debug,
        quiet: ui::quiet_requested(cli.quiet),
    })
    .ok();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PromptError>() {
                // Plain one-line diagnostic for the common mistake.
                Some(missing @ PromptError::InputDirMissing { .. }) => eprintln!("{missing}"),
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => {
            let config = PromptctlConfig::load(cli.config.as_deref())?;
            commands::run_extract(args, config)
        }
        Commands::MakamReport(args) => commands::run_makam_report(args),
        Commands::Completions(args) => run_completions(args),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
