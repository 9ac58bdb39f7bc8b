use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// The counters the orchestrator (C9) emits: batches created, events
/// processed, successful/failed mints, empty read returns, and seconds
/// since the last sealed batch (§4.9). Plain atomics rather than a lock
/// since every field is an independent monotonic counter or gauge.
#[derive(Debug, Default)]
pub struct Metrics {
    pub batches_created: AtomicU64,
    pub events_processed: AtomicU64,
    pub mints_succeeded: AtomicU64,
    pub mints_failed: AtomicU64,
    pub empty_reads: AtomicU64,
    last_batch_at_ms: AtomicI64,
}

impl Metrics {
    pub fn record_batch_sealed(&self, now_ms: i64) {
        self.batches_created.fetch_add(1, Ordering::Relaxed);
        self.last_batch_at_ms.store(now_ms, Ordering::Relaxed);
    }

    pub fn record_events_processed(&self, count: u64) {
        self.events_processed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_mint_result(&self, succeeded: bool) {
        if succeeded {
            self.mints_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.mints_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_empty_read(&self) {
        self.empty_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn seconds_since_last_batch(&self, now_ms: i64) -> Option<i64> {
        let last = self.last_batch_at_ms.load(Ordering::Relaxed);
        if last == 0 {
            None
        } else {
            Some((now_ms - last) / 1000)
        }
    }
}
