use serde::{Deserialize, Serialize};

use crate::column_value::ColumnMap;
use crate::ids::TransactionId;
use crate::merkle::MerkleLeaf;
use crate::operation::OperationKind;

/// Before/after images with values decoded into [`crate::ColumnValue`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    pub before: Option<ColumnMap>,
    pub after: Option<ColumnMap>,
}

/// Everything about a transaction except its Merkle leaf: operation,
/// timestamp, table, and payload. This is exactly the input the leaf
/// hash commits to (§4.2) — kept as its own type so the hasher can
/// canonicalize it without the circularity of hashing a field that
/// contains the hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMeta {
    pub transaction_id: TransactionId,
    pub source_ts_ms: i64,
    pub operation: OperationKind,
    pub database: String,
    pub table: String,
    pub payload: CanonicalPayload,
}

/// The normalized form of one [`crate::ChangeEvent`] inside a sealed
/// batch (§3), paired 1:1 with its [`MerkleLeaf`] at the same index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(flatten)]
    pub meta: TransactionMeta,
    pub merkle_leaf: MerkleLeaf,
}

impl Transaction {
    pub fn transaction_id(&self) -> &TransactionId {
        &self.meta.transaction_id
    }

    pub fn source_ts_ms(&self) -> i64 {
        self.meta.source_ts_ms
    }

    pub fn operation(&self) -> OperationKind {
        self.meta.operation
    }
}
