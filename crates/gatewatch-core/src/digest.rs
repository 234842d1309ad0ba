//! Content digest of a reconciled view.
//!
//! Callers compare digests across refetches and skip re-rendering when the
//! view is unchanged.

use gatewatch_domain::{Result, StageGroup};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the canonical JSON encoding of `groups`.
pub fn output_digest(groups: &[StageGroup]) -> Result<String> {
    let bytes = serde_json::to_vec(groups)?;
    Ok(compute_digest(&bytes))
}

fn compute_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
