use etrap_types::{MerkleLeaf, TransactionMeta};

use crate::hasher::sha256_hex;

/// C2: raw-data hash = SHA-256 of the canonical payload alone; leaf hash
/// = SHA-256 of the canonical serialization of the full transaction
/// metadata + payload, binding the leaf to operation, timestamp, and
/// table, not just payload content (§3, §4.2).
pub fn build_leaf(index: usize, meta: &TransactionMeta, canonical_payload_bytes: &[u8]) -> MerkleLeaf {
    let raw_data_hash = sha256_hex(canonical_payload_bytes);
    let meta_bytes =
        etrap_types::stable_json::to_bytes(meta).expect("TransactionMeta always serializes");
    let leaf_hash = sha256_hex(&meta_bytes);
    MerkleLeaf {
        index,
        leaf_hash,
        raw_data_hash,
    }
}
