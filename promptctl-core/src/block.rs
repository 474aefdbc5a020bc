use crate::dedupe::fingerprint;
use crate::slug::{first_meaningful_line, safe_slug, source_stem};

const DIGEST_LEN: usize = 10;

/// Where a block came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub file_name: String,
    /// 1-based position in the file's extracted block list
    pub index: usize,
}

/// A finished, immutable prompt block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBlock {
    pub text: String,
    pub fingerprint: String,
    pub source: Provenance,
}

impl PromptBlock {
    pub fn new(text: impl Into<String>, file_name: impl Into<String>, index: usize) -> Self {
        let text = text.into();
        let fingerprint = fingerprint(&text);
        Self {
            text,
            fingerprint,
            source: Provenance {
                file_name: file_name.into(),
                index,
            },
        }
    }

    pub fn first_line(&self) -> &str {
        first_meaningful_line(&self.text)
    }

    pub fn slug(&self) -> String {
        safe_slug(self.first_line())
    }

    pub fn short_digest(&self) -> &str {
        &self.fingerprint[..DIGEST_LEN]
    }

    /// `<stem>__<NNNN>__<slug>__<digest>.txt`
    pub fn output_file_name(&self) -> String {
        format!(
            "{}__{:04}__{}__{}.txt",
            source_stem(&self.source.file_name),
            self.source.index,
            self.slug(),
            self.short_digest()
        )
    }

    /// File body: trimmed text plus one trailing newline.
    pub fn rendered(&self) -> String {
        format!("{}\n", self.text.trim())
    }
}
