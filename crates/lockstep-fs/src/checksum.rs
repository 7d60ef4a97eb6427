//! Content fingerprints
//!
//! Lock artifacts are compared by content; the fingerprint is what gets
//! logged and reported so that large lock files never end up in log lines.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Fingerprint of `content` as `sha256:<lowercase hex>`.
pub fn compute_content_checksum(content: &str) -> String {
    format!("{}{:x}", PREFIX, Sha256::digest(content.as_bytes()))
}
