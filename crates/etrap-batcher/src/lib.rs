//! C4: per-`(database, table)` batch accumulation under size/idle/
//! hard-age triggers (§4.4).

mod accumulator;
mod buffer;
mod config;
mod shard;

pub use accumulator::{BatchAccumulator, SealedBatch};
pub use config::BatcherConfig;

#[cfg(test)]
mod tests {
    use super::*;
    use etrap_types::{ChangeEvent, OperationKind};
    use std::time::Duration;

    fn event(db: &str, table: &str, entry_id: &str, ts_ms: i64) -> ChangeEvent {
        ChangeEvent {
            stream_name: format!("etrap.public.{table}"),
            entry_id: entry_id.to_string(),
            operation: OperationKind::Insert,
            source_ts_ms: ts_ms,
            database: db.to_string(),
            table: table.to_string(),
            before: None,
            after: Some(
                [("id".to_string(), serde_json::json!(1))]
                    .into_iter()
                    .collect(),
            ),
            source_metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn seals_at_max_batch_size() {
        let config = BatcherConfig {
            max_batch_size: 3,
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        let now = 1_000_000;
        assert!(acc.ingest(event("shop", "orders", "1-0", now), now).is_none());
        assert!(acc.ingest(event("shop", "orders", "2-0", now), now).is_none());
        let sealed = acc
            .ingest(event("shop", "orders", "3-0", now), now)
            .expect("third event should seal the buffer");
        assert_eq!(sealed.batch.transactions.len(), 3);
        assert_eq!(sealed.entry_ids.len(), 3);
        assert_eq!(acc.open_buffer_count(), 0);
    }

    #[test]
    fn thousand_inserts_in_two_seconds_seal_one_batch_with_height_ten() {
        let mut acc = BatchAccumulator::new(BatcherConfig::default(), "org1");
        let base = 1_000_000;
        let mut sealed = None;
        for i in 0..1000 {
            let now = base + (i % 2) * 1000;
            let entry_id = format!("{i}-0");
            if let Some(batch) = acc.ingest(event("shop", "financial_transactions", &entry_id, now), now) {
                sealed = Some(batch);
            }
        }
        let sealed = sealed.expect("max_batch_size trigger should have fired exactly once");
        assert_eq!(sealed.batch.transactions.len(), 1000);
        assert_eq!(sealed.batch.tree.height, 10);
        assert_eq!(sealed.batch.tree.proof_index[&0].len(), 10);
    }

    #[test]
    fn idle_timeout_with_empty_buffer_produces_no_batch() {
        let mut acc = BatchAccumulator::new(BatcherConfig::default(), "org1");
        let sealed = acc.evaluate_triggers(10_000_000);
        assert!(sealed.is_empty());
    }

    #[test]
    fn idle_timeout_seals_a_buffer_above_min_batch_size() {
        let config = BatcherConfig {
            idle_timeout: Duration::from_secs(60),
            min_batch_size: 2,
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        let t0 = 0;
        acc.ingest(event("shop", "orders", "1-0", t0), t0);
        acc.ingest(event("shop", "orders", "2-0", t0), t0);
        // Not idle long enough yet.
        assert!(acc.evaluate_triggers(t0 + 30_000).is_empty());
        // Idle timeout elapsed since last insertion.
        let sealed = acc.evaluate_triggers(t0 + 61_000);
        assert_eq!(sealed.len(), 1);
        assert_eq!(sealed[0].batch.transactions.len(), 2);
    }

    #[test]
    fn below_min_batch_size_never_seals_by_idle_alone() {
        let config = BatcherConfig {
            min_batch_size: 5,
            idle_timeout: Duration::from_secs(60),
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        acc.ingest(event("shop", "orders", "1-0", 0), 0);
        // Well past idle_timeout but short of the default force_seal_after.
        let sealed = acc.evaluate_triggers(200_000);
        assert!(sealed.is_empty());
        assert_eq!(acc.open_buffer_count(), 1);
    }

    #[test]
    fn force_seal_after_seals_even_a_single_event_buffer() {
        let config = BatcherConfig {
            min_batch_size: 5,
            force_seal_after: Duration::from_secs(300),
            idle_timeout: Duration::from_secs(60),
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        acc.ingest(event("shop", "orders", "1-0", 0), 0);
        let sealed = acc.evaluate_triggers(301_000);
        assert_eq!(sealed.len(), 1);
        assert_eq!(sealed[0].batch.transactions.len(), 1);
    }

    #[test]
    fn three_events_over_six_minutes_seal_by_force_age_with_continued_idle_activity() {
        // S3: idle_timeout=60s, force_seal_after=300s; events trickle in
        // every 50s (under the idle timeout) so idle never fires, but
        // the buffer still seals once its age exceeds 300s.
        let config = BatcherConfig {
            idle_timeout: Duration::from_secs(60),
            force_seal_after: Duration::from_secs(300),
            min_batch_size: 1,
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        let t0 = 0;
        acc.ingest(event("shop", "orders", "1-0", t0), t0);
        assert!(acc.evaluate_triggers(t0 + 50_000).is_empty());
        acc.ingest(event("shop", "orders", "2-0", t0 + 50_000), t0 + 50_000);
        assert!(acc.evaluate_triggers(t0 + 100_000).is_empty());
        acc.ingest(event("shop", "orders", "3-0", t0 + 100_000), t0 + 100_000);
        assert!(acc.evaluate_triggers(t0 + 150_000).is_empty());
        let sealed = acc.evaluate_triggers(t0 + 301_000);
        assert_eq!(sealed.len(), 1);
        assert_eq!(sealed[0].batch.transactions.len(), 3);
        assert_eq!(
            sealed[0].entry_ids,
            vec![
                ("etrap.public.orders".to_string(), "1-0".to_string()),
                ("etrap.public.orders".to_string(), "2-0".to_string()),
                ("etrap.public.orders".to_string(), "3-0".to_string()),
            ]
        );
    }

    #[test]
    fn tables_seal_independently_in_deterministic_order() {
        let config = BatcherConfig {
            min_batch_size: 1,
            force_seal_after: Duration::from_secs(300),
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        acc.ingest(event("shop", "zebras", "1-0", 0), 0);
        acc.ingest(event("shop", "apples", "1-0", 0), 0);
        let sealed = acc.evaluate_triggers(301_000);
        assert_eq!(sealed.len(), 2);
        assert_eq!(sealed[0].batch.database_name, "shop");
        assert_eq!(sealed[0].batch.table_names, vec!["apples".to_string()]);
        assert_eq!(sealed[1].batch.table_names, vec!["zebras".to_string()]);
    }

    #[test]
    fn shutdown_force_seals_buffers_meeting_min_batch_size_and_drops_the_rest() {
        let config = BatcherConfig {
            min_batch_size: 2,
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        acc.ingest(event("shop", "orders", "1-0", 0), 0);
        acc.ingest(event("shop", "orders", "2-0", 0), 0);
        acc.ingest(event("shop", "carts", "1-0", 0), 0);
        let (sealed, dropped) = acc.shutdown(1_000);
        assert_eq!(sealed.len(), 1);
        assert_eq!(sealed[0].batch.table_names, vec!["orders".to_string()]);
        assert_eq!(dropped, vec![("shop".to_string(), "carts".to_string())]);
        assert_eq!(acc.open_buffer_count(), 0);
    }

    #[test]
    fn leaf_index_matches_position_in_sealed_event_stream() {
        let config = BatcherConfig {
            max_batch_size: 5,
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        let mut sealed = None;
        for i in 0..5 {
            let now = i as i64;
            if let Some(b) = acc.ingest(event("shop", "orders", &format!("{i}-0"), now), now) {
                sealed = Some(b);
            }
        }
        let sealed = sealed.unwrap();
        for (i, tx) in sealed.batch.transactions.iter().enumerate() {
            assert_eq!(tx.merkle_leaf.index, i);
            assert_eq!(
                tx.transaction_id().as_str(),
                format!("{}-{}", sealed.batch.batch_id, i)
            );
        }
    }

    #[test]
    fn batch_ids_are_unique_across_many_seals_in_one_organization() {
        let config = BatcherConfig {
            max_batch_size: 1,
            ..BatcherConfig::default()
        };
        let mut acc = BatchAccumulator::new(config, "org1");
        let mut ids = std::collections::HashSet::new();
        for i in 0..500 {
            let now = i as i64;
            let sealed = acc
                .ingest(event("shop", "orders", &format!("{i}-0"), now), now)
                .unwrap();
            assert!(
                ids.insert(sealed.batch.batch_id.to_string()),
                "duplicate batch id"
            );
        }
    }
}
