use serde::Serialize;

/// Descriptive title/description plus a reference URL pointing at
/// `batch-data.json` (§4.8).
#[derive(Debug, Clone, Serialize)]
pub struct TokenMetadata {
    pub title: String,
    pub description: String,
    pub reference_url: String,
}

/// The on-chain summary of a batch (§4.8).
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub database_name: String,
    pub table_names: Vec<String>,
    pub timestamp: i64,
    pub tx_count: usize,
    pub merkle_root: String,
    pub object_store_bucket: String,
    pub object_store_key_prefix: String,
}

impl BatchSummary {
    pub fn from_batch(batch: &etrap_types::Batch, bucket: &str, key_prefix: &str) -> Self {
        Self {
            database_name: batch.database_name.clone(),
            table_names: batch.table_names.clone(),
            timestamp: batch.created_at_ms,
            tx_count: batch.transactions.len(),
            merkle_root: batch.tree.root.clone(),
            object_store_bucket: bucket.to_string(),
            object_store_key_prefix: key_prefix.to_string(),
        }
    }
}
