//! Prompt recovery from CLI assistant transcripts (`codex-chat.txt`).
//!
//! These exports have no markup. Two markers show up around user messages,
//! neither reliably:
//! - a sentinel line (`No tasks in progress`) right after a user message
//! - a long dash separator right before one
//!
//! Both anchors are tried and the union is kept. Fenced code blocks are added
//! on top since structured prompts are often pasted inside fences.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::dedupe::dedupe_blocks;
use crate::text::normalize_newlines;

/// Sentinel that commonly follows a user message in CLI transcripts.
pub const DEFAULT_SENTINEL: &str = "No tasks in progress";

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{10,}\s*$").expect("separator regex"));

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[^\n]*\n(.*?)\n```").expect("fence regex"));

/// A line of ten or more dashes, trailing whitespace allowed.
pub fn is_separator(line: &str) -> bool {
    SEPARATOR_RE.is_match(line)
}

/// Transcript lines, addressed by index.
struct LineIndex<'a> {
    lines: Vec<&'a str>,
    sentinel: &'a str,
}

impl<'a> LineIndex<'a> {
    /// `text` must already be newline-normalized.
    fn new(text: &'a str, sentinel: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            sentinel,
        }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn is_sentinel(&self, idx: usize) -> bool {
        self.lines[idx].trim() == self.sentinel
    }

    fn is_separator(&self, idx: usize) -> bool {
        is_separator(self.lines[idx])
    }

    fn is_blank(&self, idx: usize) -> bool {
        self.lines[idx].trim().is_empty()
    }

    /// The non-blank run ending just above `idx`, skipping blank lines first.
    fn block_above(&self, idx: usize) -> String {
        let mut j = idx;
        while j > 0 && self.is_blank(j - 1) {
            j -= 1;
        }

        let mut start = j;
        while start > 0 {
            let candidate = start - 1;
            if self.is_blank(candidate)
                || self.is_separator(candidate)
                || self.is_sentinel(candidate)
            {
                break;
            }
            start = candidate;
        }

        self.lines[start..j].join("\n").trim().to_owned()
    }

    /// The non-blank run starting just below `idx`, skipping blank lines first.
    fn block_below(&self, idx: usize) -> String {
        let mut k = idx + 1;
        while k < self.len() && self.is_blank(k) {
            k += 1;
        }

        let start = k;
        while k < self.len() {
            if self.is_blank(k) || self.is_sentinel(k) || self.is_separator(k) {
                break;
            }
            k += 1;
        }

        self.lines[start..k].join("\n").trim().to_owned()
    }
}

/// Every fenced region in `text`, delimiters included.
pub fn fenced_blocks(text: &str) -> Vec<String> {
    FENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_owned())
        .filter(|block| !block.is_empty())
        .collect()
}

/// Candidate user messages from a transcript, deduplicated in first-seen
/// order: anchor blocks in line order, then fenced blocks.
pub fn extract_transcript_blocks(text: &str, sentinel: &str) -> Vec<String> {
    let normalized = normalize_newlines(text);
    let index = LineIndex::new(&normalized, sentinel);
    let mut candidates = Vec::new();

    for i in 0..index.len() {
        let block = if index.is_sentinel(i) {
            index.block_above(i)
        } else if index.is_separator(i) {
            index.block_below(i)
        } else {
            continue;
        };
        if !block.is_empty() {
            candidates.push(block);
        }
    }

    let anchored = candidates.len();
    candidates.extend(fenced_blocks(&normalized));
    debug!(
        anchored,
        fenced = candidates.len() - anchored,
        "transcript candidates collected"
    );

    dedupe_blocks(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        extract_transcript_blocks(text, DEFAULT_SENTINEL)
    }

    #[test]
    fn sentinel_takes_block_above() {
        assert_eq!(extract("hello world\nNo tasks in progress\n"), vec!["hello world"]);
    }

    #[test]
    fn separator_takes_block_below() {
        assert_eq!(extract("----------\nnext task here\n"), vec!["next task here"]);
    }

    #[test]
    fn block_above_skips_blank_lines_and_stops_at_separator() {
        let text = "noise\n------------\nline one\nline two\n\n\n  No tasks in progress  \n";
        let blocks = extract(text);
        assert_eq!(blocks, vec!["line one\nline two"]);
    }

    #[test]
    fn block_below_stops_at_sentinel() {
        let text = "----------\n\nfix the bug\nNo tasks in progress\nassistant reply\n";
        // The separator and the sentinel both point at the same message.
        assert_eq!(extract(text), vec!["fix the bug"]);
    }

    #[test]
    fn short_dash_runs_are_not_separators() {
        assert!(!is_separator("---------"));
        assert!(is_separator("----------   "));
        assert!(!is_separator("  ----------"));
        assert!(extract("---------\nnot a prompt\n").is_empty());
    }

    #[test]
    fn adjacent_sentinels_yield_nothing_extra() {
        let text = "No tasks in progress\nNo tasks in progress\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn fenced_region_is_kept_verbatim() {
        let text = "intro\n```text\nROLE: spec\nOBJECTIVE: x\n```\noutro\n";
        assert_eq!(extract(text), vec!["```text\nROLE: spec\nOBJECTIVE: x\n```"]);
    }

    #[test]
    fn fences_match_non_greedily() {
        let text = "```\na\n```\nbetween\n```\nb\n```\n";
        assert_eq!(fenced_blocks(text), vec!["```\na\n```", "```\nb\n```"]);
    }

    #[test]
    fn crlf_transcripts_are_normalized() {
        assert_eq!(extract("do it\r\nNo tasks in progress\r\n"), vec!["do it"]);
    }

    #[test]
    fn repeated_prompts_collapse() {
        let text = "same ask\nNo tasks in progress\n----------\nsame ask\n";
        assert_eq!(extract(text), vec!["same ask"]);
    }

    #[test]
    fn custom_sentinel_is_honored() {
        let blocks = extract_transcript_blocks("ship it\n>>> idle\n", ">>> idle");
        assert_eq!(blocks, vec!["ship it"]);
    }
}
