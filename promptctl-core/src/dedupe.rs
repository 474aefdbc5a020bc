use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the exact block bytes.
pub fn fingerprint(block: &str) -> String {
    hex::encode(Sha256::digest(block.as_bytes()))
}

/// Drop every block whose fingerprint was already seen; first occurrence wins.
pub fn dedupe_blocks<I>(blocks: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    blocks
        .into_iter()
        .filter(|block| seen.insert(fingerprint(block)))
        .collect()
}
