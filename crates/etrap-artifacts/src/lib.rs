//! C6: assembles the three stable-serialized documents a sealed batch
//! produces (§4.6) — the batch body, the standalone tree, and the three
//! index documents — ready for C7 to upload.

use serde::Serialize;

use etrap_types::{Batch, BatchId, MerkleTree, Transaction};

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
pub struct BatchInfo {
    pub batch_id: BatchId,
    pub created_at: String,
    pub organization_id: String,
    pub database_name: String,
    pub agent_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchBody {
    pub batch_info: BatchInfo,
    pub transactions: Vec<Transaction>,
    pub merkle_tree: MerkleTree,
}

/// The documents produced for one sealed batch, already serialized to
/// their final stable-JSON bytes (§4.6). Field order here mirrors the
/// upload order C7 must use (§4.7): supporting documents first, batch
/// body last.
pub struct ArtifactSet {
    pub by_timestamp: Vec<u8>,
    pub by_operation: Vec<u8>,
    pub by_date: Vec<u8>,
    pub merkle_tree: Vec<u8>,
    pub batch_data: Vec<u8>,
}

impl ArtifactSet {
    /// `(relative_key, bytes)` pairs in upload order: the four
    /// supporting documents first, `batch-data.json` last (§4.7).
    pub fn uploads(&self) -> [(&'static str, &[u8]); 5] {
        [
            ("indices/by_timestamp.json", &self.by_timestamp),
            ("indices/by_operation.json", &self.by_operation),
            ("indices/by_date.json", &self.by_date),
            ("merkle-tree.json", &self.merkle_tree),
            ("batch-data.json", &self.batch_data),
        ]
    }
}

/// Builds the full artifact set for a sealed batch. Every document uses
/// `serde_json`'s compact writer over already key-ordered maps, which
/// is sufficient for the "stable serialization" requirement (§4.6) —
/// see [`etrap_types::stable_json`].
pub fn compose(batch: &Batch) -> serde_json::Result<ArtifactSet> {
    let batch_info = BatchInfo {
        batch_id: batch.batch_id.clone(),
        created_at: etrap_types::timestamp::ms_to_canonical_iso(batch.created_at_ms),
        organization_id: batch.organization_id.clone(),
        database_name: batch.database_name.clone(),
        agent_version: AGENT_VERSION.to_string(),
    };
    let body = BatchBody {
        batch_info,
        transactions: batch.transactions.clone(),
        merkle_tree: batch.tree.clone(),
    };

    Ok(ArtifactSet {
        by_timestamp: etrap_types::stable_json::to_bytes(&batch.indices.by_timestamp)?,
        by_operation: etrap_types::stable_json::to_bytes(&batch.indices.by_operation)?,
        by_date: etrap_types::stable_json::to_bytes(&batch.indices.by_date)?,
        merkle_tree: etrap_types::stable_json::to_bytes(&batch.tree)?,
        batch_data: etrap_types::stable_json::to_bytes(&body)?,
    })
}
