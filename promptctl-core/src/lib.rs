pub mod block;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod export;
pub mod html;
pub mod makam;
pub mod markers;
pub mod pipeline;
pub mod role_spec;
pub mod slug;
pub mod text;
pub mod transcript;

pub use block::{PromptBlock, Provenance};
pub use config::{ExtractRules, PromptKind, PromptctlConfig};
pub use dedupe::{dedupe_blocks, fingerprint};
pub use error::{PromptError, Result};
pub use export::{ExportFile, ExportKind};
pub use html::{extract_role_blocks, plain_text, RoleScope};
pub use makam::{build_report, write_report, MakamReport};
pub use pipeline::{extract_prompts, ExtractOptions, ExtractSummary};
pub use role_spec::extract_role_spec_blocks;
pub use transcript::extract_transcript_blocks;
