use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::block::PromptBlock;
use crate::config::{ExtractRules, PromptKind, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use crate::error::{PromptError, Result};
use crate::export::ExportFile;
use crate::markers::is_official;
use crate::slug::date_folder;

/// Path components with this prefix hold generated output and are never read.
const GENERATED_PREFIX: &str = "prompts";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub kind: PromptKind,
    pub rules: ExtractRules,
    pub dry_run: bool,
    pub show_progress: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            kind: PromptKind::All,
            rules: ExtractRules::default(),
            dry_run: false,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    pub files_with_prompts: usize,
    pub prompts_written: usize,
    pub written: Vec<PathBuf>,
}

/// Walk the export tree, extract prompt blocks and write one file per block.
#[instrument(skip_all)]
pub fn extract_prompts(opts: &ExtractOptions) -> Result<ExtractSummary> {
    if !opts.input_dir.is_dir() {
        return Err(PromptError::input_dir_missing(&opts.input_dir));
    }
    opts.rules.validate()?;

    if !opts.dry_run {
        fs::create_dir_all(&opts.output_dir)
            .map_err(|err| PromptError::io(&opts.output_dir, err))?;
    }

    let root = absolute(&opts.input_dir);
    let out_root = absolute(&opts.output_dir);
    let files = collect_export_files(&root, &out_root)?;

    let progress_bar = maybe_spinner_pb(opts.show_progress);
    let mut summary = ExtractSummary::default();

    for path in files {
        summary.files_scanned += 1;
        let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
        let export = ExportFile::classify(path, &opts.rules);

        if let Some(pb) = progress_bar.as_ref() {
            pb.set_message(relative.display().to_string());
            pb.inc(1);
        }

        let prompts = export.extract(&opts.rules)?;
        if prompts.is_empty() {
            continue;
        }
        summary.files_with_prompts += 1;

        let date = date_folder(&relative).unwrap_or_else(|| opts.rules.fallback_date.clone());
        let date_dir = opts.output_dir.join(&date);
        if !opts.dry_run {
            fs::create_dir_all(&date_dir).map_err(|err| PromptError::io(&date_dir, err))?;
        }

        let file_name = export.file_name();
        for (idx, text) in prompts.into_iter().enumerate() {
            if opts.kind == PromptKind::Official && !is_official(&text) {
                continue;
            }

            let block = PromptBlock::new(text, file_name.as_str(), idx + 1);
            let out_path = date_dir.join(block.output_file_name());
            write_block(&block, &out_path, opts.dry_run)?;
            summary.prompts_written += 1;
            summary.written.push(out_path);
        }
    }

    let message = format!(
        "Extraction complete: {} prompt(s) from {} of {} file(s) under {:?}",
        summary.prompts_written, summary.files_with_prompts, summary.files_scanned, opts.output_dir
    );
    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }
    info!(target: "promptctl::extract", "{}", message);

    Ok(summary)
}

/// Files under `root` in path order, minus generated output. Symlinks to
/// files are kept; directory symlinks are not descended into.
pub fn collect_export_files(root: &Path, out_root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.starts_with(out_root) || is_generated(root, &path) {
            debug!(path = %path.display(), "skipping generated output");
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

fn is_generated(root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|part| part.starts_with(GENERATED_PREFIX))
    })
}

fn write_block(block: &PromptBlock, path: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        debug!(path = %path.display(), "dry-run: skipping write");
        return Ok(());
    }
    fs::write(path, block.rendered()).map_err(|err| PromptError::io(path, err))?;
    debug!(path = %path.display(), digest = block.short_digest(), "prompt written");
    Ok(())
}

/// Canonical path when it exists, so walk results and the output root compare
/// reliably; the path as given otherwise.
fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn new_spinner_pb() -> Option<ProgressBar> {
    let style = ProgressStyle::with_template("{spinner:.green} scanned {pos}: {msg}").ok()?;
    let pb = ProgressBar::new_spinner();
    pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

fn maybe_spinner_pb(show_progress: bool) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }
    new_spinner_pb().filter(|pb| !pb.is_hidden())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_components_are_detected() {
        let root = Path::new("/exports");
        assert!(is_generated(root, Path::new("/exports/prompts/20250101/a.txt")));
        assert!(is_generated(root, Path::new("/exports/20250101/prompts_old/codex-chat.txt")));
        assert!(!is_generated(root, Path::new("/exports/20250101/codex-chat.txt")));
        assert!(!is_generated(root, Path::new("/elsewhere/prompts/a.txt")));
    }

    #[test]
    fn missing_input_dir_is_reported() {
        let opts = ExtractOptions {
            input_dir: PathBuf::from("/no/such/export/root"),
            show_progress: false,
            ..Default::default()
        };
        let err = extract_prompts(&opts).unwrap_err();
        assert!(matches!(err, PromptError::InputDirMissing { .. }));
    }
}
