use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_SLUG_LEN: usize = 64;
const MAX_SLUG_SOURCE_CHARS: usize = 200;
const MAX_FENCE_LINE_CHARS: usize = 16;

pub const FALLBACK_SLUG: &str = "prompt";
pub const FALLBACK_STEM: &str = "export";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("unsafe chars regex"));

const EDGE_CHARS: [char; 3] = ['-', '.', '_'];

/// Filesystem-safe slug: only `[A-Za-z0-9._-]`, at most 64 chars, never empty.
pub fn safe_slug(input: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(input.trim(), " ");
    let head: String = collapsed.chars().take(MAX_SLUG_SOURCE_CHARS).collect();

    let replaced = UNSAFE_RE.replace_all(&head, "-");
    let mut slug = replaced.trim_matches(EDGE_CHARS).to_string();

    // Everything left is ASCII, so byte truncation is safe.
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches(EDGE_CHARS).to_string();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Sanitized source file name used as the output name prefix.
pub fn source_stem(file_name: &str) -> String {
    let replaced = UNSAFE_RE.replace_all(file_name, "-");
    let stem = replaced.trim_matches(EDGE_CHARS);
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// A short line opening or closing a code fence (```` ```rust ````).
pub fn is_fence_line(line: &str) -> bool {
    let s = line.trim();
    s.starts_with("```") && s.chars().count() <= MAX_FENCE_LINE_CHARS
}

/// First line that is neither blank nor a bare fence, trimmed.
pub fn first_meaningful_line(block: &str) -> &str {
    block
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_fence_line(line))
        .unwrap_or("")
}

/// First path component that is exactly eight ASCII digits (`20250114`).
pub fn date_folder(relative: &Path) -> Option<String> {
    relative
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .find(|part| part.len() == 8 && part.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic_cases() {
        assert_eq!(safe_slug("Fix the   login bug!"), "Fix-the-login-bug");
        assert_eq!(safe_slug("ROLE: You are ChatGPT-Codex"), "ROLE-You-are-ChatGPT-Codex");
        assert_eq!(safe_slug("v1.2_release-notes"), "v1.2_release-notes");
    }

    #[test]
    fn slug_falls_back_when_nothing_survives() {
        assert_eq!(safe_slug(""), "prompt");
        assert_eq!(safe_slug("   "), "prompt");
        assert_eq!(safe_slug("日本語のみ"), "prompt");
        assert_eq!(safe_slug("..--__"), "prompt");
    }

    #[test]
    fn slug_truncates_and_cleans() {
        let long = format!("{}-{}", "a".repeat(63), "b".repeat(10));
        let slug = safe_slug(&long);
        assert_eq!(slug, "a".repeat(63));

        let slug = safe_slug(&"x".repeat(300));
        assert_eq!(slug.len(), MAX_SLUG_LEN);
    }

    #[test]
    fn stem_sanitization() {
        assert_eq!(source_stem("codex-chat.txt"), "codex-chat.txt");
        assert_eq!(source_stem("My Chat (1).html"), "My-Chat-1-.html");
        assert_eq!(source_stem("★★★"), "export");
    }

    #[test]
    fn fence_lines_are_skipped_for_naming() {
        assert!(is_fence_line("```"));
        assert!(is_fence_line("  ```typescript  "));
        assert!(!is_fence_line("```this is a much longer line"));
        assert_eq!(first_meaningful_line("\n```text\n\n  Build it  \nmore"), "Build it");
        assert_eq!(first_meaningful_line("```\n```"), "");
    }

    #[test]
    fn date_folder_detection() {
        assert_eq!(
            date_folder(Path::new("exports/20250114/codex-chat.txt")),
            Some("20250114".to_string())
        );
        assert_eq!(date_folder(Path::new("2025-01-14/codex-chat.txt")), None);
        assert_eq!(date_folder(Path::new("202501140/chat.html")), None);
    }
}
