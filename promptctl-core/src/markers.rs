use once_cell::sync::Lazy;
use regex::Regex;

static ROLE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*ROLE:\s*You are\s+ChatGPT-?Codex\b").expect("role line regex")
});

static SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(PRIMARY OBJECTIVE|OBJECTIVE|DELIVERABLES|OUTPUT FORMAT|CONSTRAINTS)\s*:")
        .expect("section regex")
});

static OFFICIAL_ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*ROLE:\s*You are\s+ChatGPT-?Codex\b").expect("official role regex")
});

static OFFICIAL_OBJECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(PRIMARY OBJECTIVE|OBJECTIVE|DELIVERABLES)\s*:")
        .expect("official objective regex")
});

static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[).\]]\s+").expect("numbered item regex"));

static CAPS_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9 _-]{2,}:").expect("caps label regex"));

/// `ROLE: You are ChatGPT-Codex ...` at line start.
pub fn is_role_line(line: &str) -> bool {
    ROLE_LINE_RE.is_match(line)
}

/// One of the labelled spec sections (`OBJECTIVE:`, `DELIVERABLES:` ...).
pub fn is_section_line(line: &str) -> bool {
    SECTION_RE.is_match(line)
}

/// Whether a line plausibly continues a structured spec: blanks, fences,
/// bullets, headings, numbered items, `LABEL:` lines and section markers.
pub fn looks_like_spec_line(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return true;
    }
    if s.starts_with("```") || s.starts_with(['-', '*', '#']) {
        return true;
    }
    NUMBERED_RE.is_match(s) || CAPS_LABEL_RE.is_match(s) || SECTION_RE.is_match(s)
}

/// A block counts as an "official" task prompt when it declares the persona
/// and carries at least one objective/deliverables section.
pub fn is_official(block: &str) -> bool {
    OFFICIAL_ROLE_RE.is_match(block) && OFFICIAL_OBJECTIVE_RE.is_match(block)
}
