use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{BatchId, TransactionId};
use crate::merkle::MerkleTree;
use crate::transaction::Transaction;

/// The three search indices persisted alongside a batch's tree (§3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indices {
    pub by_timestamp: BTreeMap<i64, TransactionId>,
    /// Keyed by [`crate::OperationKind::as_str`].
    pub by_operation: BTreeMap<String, Vec<TransactionId>>,
    /// Keyed by `YYYY-MM-DD`.
    pub by_date: BTreeMap<String, Vec<TransactionId>>,
}

impl Indices {
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut indices = Self::default();
        for tx in transactions {
            indices
                .by_timestamp
                .insert(tx.source_ts_ms(), tx.transaction_id().clone());
            indices
                .by_operation
                .entry(tx.operation().as_str().to_string())
                .or_default()
                .push(tx.transaction_id().clone());
            let date = crate::timestamp::ms_to_date(tx.source_ts_ms());
            indices
                .by_date
                .entry(date)
                .or_default()
                .push(tx.transaction_id().clone());
        }
        indices
    }
}

/// A sealed, immutable group of change events committed atomically to the
/// object store and anchored on-chain (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: BatchId,
    pub created_at_ms: i64,
    pub organization_id: String,
    pub database_name: String,
    /// Typically one table; see §4.4 on multi-table batches.
    pub table_names: Vec<String>,
    pub transactions: Vec<Transaction>,
    pub tree: MerkleTree,
    pub indices: Indices,
}

impl Batch {
    /// The canonical table prefix used for object-store keys: the first
    /// table name in sorted order (§4.7).
    pub fn canonical_table(&self) -> &str {
        self.table_names
            .iter()
            .min()
            .map(String::as_str)
            .unwrap_or("_unknown")
    }
}
