use sha2::{Digest, Sha256};

use crate::height::HeightFunction;
use crate::matrix::AlternatingSignMatrix;

/// Schema tag mixed into every hash so layout changes invalidate old digests.
const HASH_SCHEMA: u64 = 1;

fn hex(digest: &[u8]) -> String {
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
}

/// Computes the canonical structural hash for an alternating sign matrix.
pub fn canonical_matrix_hash(matrix: &AlternatingSignMatrix) -> String {
    let mut hasher = Sha256::new();
    hasher.update(HASH_SCHEMA.to_le_bytes());
    hasher.update((matrix.order().get() as u64).to_le_bytes());
    for row in matrix.rows() {
        for &entry in row {
            hasher.update(entry.to_le_bytes());
        }
    }
    hex(&hasher.finalize())
}

/// Computes the canonical hash of a height function.
pub fn canonical_height_hash(config: &HeightFunction) -> String {
    let mut hasher = Sha256::new();
    hasher.update(HASH_SCHEMA.to_le_bytes());
    hasher.update((config.order().get() as u64).to_le_bytes());
    for &height in config.heights() {
        hasher.update(height.to_le_bytes());
    }
    hex(&hasher.finalize())
}

/// Hashes any serializable value through its canonical JSON encoding.
pub fn canonical_json_hash<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hex(&Sha256::digest(bytes)))
}
