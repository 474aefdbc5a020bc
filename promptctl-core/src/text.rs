//! Text loading and the small string helpers shared by every extractor.

use std::fs;
use std::path::Path;

use crate::error::{PromptError, Result};
use crate::html;

/// Collapse `\r\n` and lone `\r` into `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Read a whole file with permissive decoding.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|err| PromptError::io(path, err))?;
    Ok(decode_lossy(&bytes))
}

/// True for `.html` / `.htm`, case-insensitive.
pub fn is_markup(path: &Path) -> bool {
    matches!(lower_extension(path).as_deref(), Some("html" | "htm"))
}

pub(crate) fn lower_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Load a file as plain text. Markup is flattened to its character data;
/// everything else is returned as decoded.
pub fn load_text(path: &Path) -> Result<String> {
    let raw = read_lossy(path)?;
    if is_markup(path) {
        Ok(html::plain_text(&raw))
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_collapse_to_lf() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn invalid_bytes_are_dropped() {
        let bytes = b"ok \xff\xfe then more";
        assert_eq!(decode_lossy(bytes), "ok  then more");
    }

    #[test]
    fn markup_detection_ignores_case() {
        assert!(is_markup(Path::new("chat.HTML")));
        assert!(is_markup(Path::new("20250101/export.htm")));
        assert!(!is_markup(Path::new("codex-chat.txt")));
        assert!(!is_markup(Path::new("html")));
    }
}
