//! Export file classification and per-kind extraction dispatch.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ExtractRules;
use crate::dedupe::dedupe_blocks;
use crate::error::Result;
use crate::html::extract_role_blocks_with;
use crate::role_spec::extract_role_spec_blocks;
use crate::text::{is_markup, load_text, lower_extension, normalize_newlines, read_lossy};
use crate::transcript::extract_transcript_blocks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Web chat HTML export with author-role markers
    HtmlChat,
    /// Plain-text CLI assistant transcript
    TranscriptTxt,
    /// A file that already is one prompt
    ExplicitPrompt,
    Unrecognized,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportKind::HtmlChat => "html-chat",
            ExportKind::TranscriptTxt => "transcript-txt",
            ExportKind::ExplicitPrompt => "explicit-prompt",
            ExportKind::Unrecognized => "unrecognized",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub path: PathBuf,
    pub kind: ExportKind,
}

impl ExportFile {
    pub fn classify(path: impl Into<PathBuf>, rules: &ExtractRules) -> Self {
        let path = path.into();
        let kind = classify_kind(&path, rules);
        Self { path, kind }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read the file and return its prompt blocks, deduplicated.
    pub fn extract(&self, rules: &ExtractRules) -> Result<Vec<String>> {
        let blocks = match self.kind {
            ExportKind::ExplicitPrompt => {
                let content = load_text(&self.path)?;
                let content = normalize_newlines(&content);
                let content = content.trim();
                if content.is_empty() {
                    Vec::new()
                } else {
                    vec![content.to_owned()]
                }
            }
            ExportKind::HtmlChat => {
                let raw = read_lossy(&self.path)?;
                dedupe_blocks(extract_role_blocks_with(&raw, &rules.role_attribute, &rules.role))
            }
            ExportKind::TranscriptTxt => {
                let text = load_text(&self.path)?;
                let specs = extract_role_spec_blocks(&text);
                let prompts = extract_transcript_blocks(&text, &rules.sentinel);
                debug!(specs = specs.len(), prompts = prompts.len(), "transcript extracted");
                dedupe_blocks(specs.into_iter().chain(prompts))
            }
            ExportKind::Unrecognized => Vec::new(),
        };

        debug!(
            path = %self.path.display(),
            kind = %self.kind,
            blocks = blocks.len(),
            "extracted"
        );
        Ok(blocks)
    }
}

fn classify_kind(path: &Path, rules: &ExtractRules) -> ExportKind {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let extension = lower_extension(path);

    if name.starts_with(&rules.explicit_prefix.to_lowercase())
        && matches!(extension.as_deref(), Some("txt" | "md"))
    {
        return ExportKind::ExplicitPrompt;
    }
    if is_markup(path) {
        return ExportKind::HtmlChat;
    }
    if rules
        .transcript_names
        .iter()
        .any(|candidate| candidate.to_lowercase() == name)
    {
        return ExportKind::TranscriptTxt;
    }
    ExportKind::Unrecognized
}
