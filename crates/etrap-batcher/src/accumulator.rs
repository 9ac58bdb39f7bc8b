use std::collections::BTreeMap;

use etrap_types::{Batch, BatchId, ChangeEvent, Indices, Transaction, TransactionMeta};

use crate::buffer::Buffer;
use crate::config::BatcherConfig;
use crate::shard::shard_for;

type BufferKey = (String, String);

/// A freshly sealed batch plus the `(stream_name, entry_id)` pairs of
/// every broker entry that fed it, in the order the consumer must
/// acknowledge them once the batch is fully committed (§4.5).
#[derive(Debug)]
pub struct SealedBatch {
    pub batch: Batch,
    pub entry_ids: Vec<(String, String)>,
}

/// C4: maintains one open buffer per observed `(database, table)` and
/// seals them into [`Batch`]es under the size/idle/hard-age triggers of
/// §4.4, running the canonicalizer and Merkle builder (C1/C2/C3) at
/// seal time.
pub struct BatchAccumulator {
    config: BatcherConfig,
    organization_id: String,
    buffers: BTreeMap<BufferKey, Buffer>,
    /// `(date, shard) -> next suffix`, so two seals of the same shard
    /// within the same day get distinct, still-opaque `-T<n>` ids.
    seal_counters: BTreeMap<(String, u32), u32>,
}

impl BatchAccumulator {
    pub fn new(config: BatcherConfig, organization_id: impl Into<String>) -> Self {
        Self {
            config,
            organization_id: organization_id.into(),
            buffers: BTreeMap::new(),
            seal_counters: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }

    /// Adds one event to its table's buffer. Returns a sealed batch
    /// immediately if this insertion reached `max_batch_size` (§4.4).
    pub fn ingest(&mut self, event: ChangeEvent, now_ms: i64) -> Option<SealedBatch> {
        let key = (event.database.clone(), event.table.clone());
        let buffer = self
            .buffers
            .entry(key.clone())
            .or_insert_with(|| Buffer::new(now_ms));
        buffer.push(event, now_ms);
        if buffer.events.len() >= self.config.max_batch_size {
            return Some(self.seal(&key, now_ms));
        }
        None
    }

    /// Runs on every consumer read return, whether or not it carried
    /// events (§4.4). Tables are evaluated independently; sealing order
    /// across buffers is deterministic (sorted by key, since `buffers`
    /// is a `BTreeMap`).
    pub fn evaluate_triggers(&mut self, now_ms: i64) -> Vec<SealedBatch> {
        let keys: Vec<BufferKey> = self.buffers.keys().cloned().collect();
        let mut sealed = Vec::new();
        for key in keys {
            if self.should_seal(&key, now_ms) {
                sealed.push(self.seal(&key, now_ms));
            }
        }
        sealed
    }

    fn should_seal(&self, key: &BufferKey, now_ms: i64) -> bool {
        let buf = match self.buffers.get(key) {
            Some(b) => b,
            None => return false,
        };
        let age_ms = now_ms - buf.first_inserted_at_ms;
        let idle_ms = now_ms - buf.last_inserted_at_ms;
        let force_triggered = age_ms >= self.config.force_seal_after.as_millis() as i64;
        let idle_triggered = buf.events.len() >= self.config.min_batch_size
            && idle_ms >= self.config.idle_timeout.as_millis() as i64;
        force_triggered || idle_triggered
    }

    /// Graceful shutdown (§4.9): force-seals every buffer that meets
    /// `min_batch_size` and returns the rest as dropped keys — those
    /// events are not acknowledged and will be redelivered on restart.
    pub fn shutdown(&mut self, now_ms: i64) -> (Vec<SealedBatch>, Vec<BufferKey>) {
        let keys: Vec<BufferKey> = self.buffers.keys().cloned().collect();
        let mut sealed = Vec::new();
        let mut dropped = Vec::new();
        for key in keys {
            let len = self.buffers.get(&key).map(|b| b.events.len()).unwrap_or(0);
            if len >= self.config.min_batch_size {
                sealed.push(self.seal(&key, now_ms));
            } else {
                self.buffers.remove(&key);
                dropped.push(key);
            }
        }
        (sealed, dropped)
    }

    /// Number of currently-open buffers, for observability only.
    pub fn open_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    fn seal(&mut self, key: &BufferKey, now_ms: i64) -> SealedBatch {
        let buffer = self
            .buffers
            .remove(key)
            .expect("seal is only called for a key with an open buffer");
        let batch_id = self.next_batch_id(key, now_ms);
        let entry_ids = buffer
            .events
            .iter()
            .map(|e| (e.stream_name.clone(), e.entry_id.clone()))
            .collect();

        let transactions: Vec<Transaction> = buffer
            .events
            .into_iter()
            .enumerate()
            .map(|(index, event)| build_transaction(&batch_id, index, event))
            .collect();

        let leaf_hashes = transactions
            .iter()
            .map(|t| t.merkle_leaf.leaf_hash.clone())
            .collect();
        let tree = etrap_merkle::build_tree(leaf_hashes)
            .expect("a sealed buffer always has at least one event");
        let indices = Indices::build(&transactions);

        tracing::debug!(
            batch_id = %batch_id,
            database = %key.0,
            table = %key.1,
            tx_count = transactions.len(),
            "sealed batch",
        );

        let batch = Batch {
            batch_id,
            created_at_ms: now_ms,
            organization_id: self.organization_id.clone(),
            database_name: key.0.clone(),
            table_names: vec![key.1.clone()],
            transactions,
            tree,
            indices,
        };
        SealedBatch { batch, entry_ids }
    }

    fn next_batch_id(&mut self, key: &BufferKey, now_ms: i64) -> BatchId {
        let date = etrap_types::timestamp::ms_to_date(now_ms);
        let shard = shard_for(&self.organization_id, &key.0, &key.1);
        let counter = self.seal_counters.entry((date.clone(), shard)).or_insert(0);
        let suffix = if *counter == 0 { None } else { Some(*counter) };
        *counter += 1;
        BatchId::new(&date, shard, suffix)
    }
}

fn build_transaction(batch_id: &BatchId, index: usize, event: ChangeEvent) -> Transaction {
    let payload = etrap_canonical::canonicalize_event(&event);
    let payload_bytes = etrap_canonical::canonical_payload_bytes(&payload);
    let meta = TransactionMeta {
        transaction_id: etrap_types::TransactionId::new(batch_id, index),
        source_ts_ms: event.source_ts_ms,
        operation: event.operation,
        database: event.database,
        table: event.table,
        payload,
    };
    let merkle_leaf = etrap_merkle::build_leaf(index, &meta, &payload_bytes);
    Transaction { meta, merkle_leaf }
}
