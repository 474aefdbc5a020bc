//! Structured task specs embedded in transcripts.
//!
//! A spec opens with a persona declaration (`ROLE: You are ChatGPT-Codex`)
//! and carries labelled sections (`OBJECTIVE:`, `DELIVERABLES:` ...). Its end
//! is never delimited, so the block runs until the next declaration, or until
//! a section has been seen and a blank line is followed by something that no
//! longer reads like spec content.

use tracing::debug;

use crate::dedupe::dedupe_blocks;
use crate::markers::{is_role_line, is_section_line, looks_like_spec_line};
use crate::text::normalize_newlines;

/// Extract every persona-declared spec block, deduplicated in order.
pub fn extract_role_spec_blocks(text: &str) -> Vec<String> {
    let normalized = normalize_newlines(text);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !is_role_line(lines[i]) {
            i += 1;
            continue;
        }

        let start = i;
        i += 1;
        let mut saw_section = false;
        // Blank lines directly above the current one.
        let mut blank_run = 0usize;

        while i < lines.len() {
            let line = lines[i];
            if is_role_line(line) {
                break;
            }

            let blank = line.trim().is_empty();
            if is_section_line(line) {
                saw_section = true;
            }
            if saw_section && blank_run >= 1 && !blank && !looks_like_spec_line(line) {
                break;
            }

            blank_run = if blank { blank_run + 1 } else { 0 };
            i += 1;
        }

        let block = lines[start..i].join("\n").trim().to_owned();
        if !block.is_empty() {
            debug!(start, end = i, "role spec block");
            blocks.push(block);
        }
    }

    dedupe_blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLE: &str = "ROLE: You are ChatGPT-Codex, acting as the implementer.";

    #[test]
    fn stops_at_plain_line_after_blank() {
        let text = format!("{ROLE}\nOBJECTIVE: add a parser\n\nthanks, let me know how it goes\n");
        assert_eq!(
            extract_role_spec_blocks(&text),
            vec![format!("{ROLE}\nOBJECTIVE: add a parser")]
        );
    }

    #[test]
    fn tolerates_interior_blank_lines_and_lists() {
        let text = format!(
            "chatter\n{ROLE}\n\nOBJECTIVE:\n- one\n- two\n\nDELIVERABLES:\n1. code\n2. tests\n\n## Notes\nkeep it small\n\nok bye\n"
        );
        let blocks = extract_role_spec_blocks(&text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with(ROLE));
        assert!(blocks[0].ends_with("keep it small"));
        assert!(!blocks[0].contains("ok bye"));
        assert!(!blocks[0].contains("chatter"));
    }

    #[test]
    fn plain_prose_before_any_section_is_kept() {
        let text = format!("{ROLE}\n\nplease read carefully\n\nOBJECTIVE: x\n");
        assert_eq!(
            extract_role_spec_blocks(&text),
            vec![format!("{ROLE}\n\nplease read carefully\n\nOBJECTIVE: x")]
        );
    }

    #[test]
    fn next_role_line_starts_a_new_block() {
        let text = format!("{ROLE}\nOBJECTIVE: a\n{ROLE}\nOBJECTIVE: b\n");
        assert_eq!(
            extract_role_spec_blocks(&text),
            vec![
                format!("{ROLE}\nOBJECTIVE: a"),
                format!("{ROLE}\nOBJECTIVE: b"),
            ]
        );
    }

    #[test]
    fn runs_to_end_of_input_without_terminator() {
        let text = format!("{ROLE}\nCONSTRAINTS: none\nstill spec");
        assert_eq!(
            extract_role_spec_blocks(&text),
            vec![format!("{ROLE}\nCONSTRAINTS: none\nstill spec")]
        );
    }

    #[test]
    fn repeated_specs_collapse() {
        let text = format!("{ROLE}\nOBJECTIVE: a\n\nbye\n{ROLE}\nOBJECTIVE: a\n\nbye again\n");
        assert_eq!(extract_role_spec_blocks(&text).len(), 1);
    }

    #[test]
    fn no_role_line_means_no_blocks() {
        assert!(extract_role_spec_blocks("OBJECTIVE: x\n\nhello\n").is_empty());
    }
}
