use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::broker::StreamBroker;
use crate::entry::StreamEntry;

struct FakeStream {
    entries: Vec<(String, serde_json::Value)>,
    groups: BTreeSet<String>,
    acked: BTreeSet<String>,
    cursor: HashMap<String, usize>,
}

/// An in-process broker used by tests and by the fake end-to-end
/// harness: no network, fully synchronous under a mutex, but honors the
/// same discovery/group/ack contract as the Redis implementation.
#[derive(Default)]
pub struct FakeBroker {
    streams: Mutex<HashMap<String, FakeStream>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/setup helper: appends one entry to `stream`, auto-assigning
    /// a Redis-style `<seq>-0` entry id, and creates the stream if absent.
    pub fn publish(&self, stream: &str, envelope: serde_json::Value) -> String {
        let mut streams = self.streams.lock().unwrap();
        let s = streams.entry(stream.to_string()).or_insert_with(|| FakeStream {
            entries: Vec::new(),
            groups: BTreeSet::new(),
            acked: BTreeSet::new(),
            cursor: HashMap::new(),
        });
        let id = format!("{}-0", s.entries.len() + 1);
        s.entries.push((id.clone(), envelope));
        id
    }

    pub fn acked_entries(&self, stream: &str) -> Vec<String> {
        let streams = self.streams.lock().unwrap();
        streams
            .get(stream)
            .map(|s| s.acked.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StreamBroker for FakeBroker {
    async fn discover_streams(&self, pattern: &str) -> etrap_utils::Result<Vec<String>> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| etrap_utils::Error::ConfigurationError(e.to_string()))?;
        let streams = self.streams.lock().unwrap();
        let mut found: Vec<String> = streams
            .keys()
            .filter(|name| pattern.matches(name))
            .cloned()
            .collect();
        found.sort();
        Ok(found)
    }

    async fn ensure_group(&self, stream: &str, group: &str) -> etrap_utils::Result<()> {
        let mut streams = self.streams.lock().unwrap();
        let s = streams.entry(stream.to_string()).or_insert_with(|| FakeStream {
            entries: Vec::new(),
            groups: BTreeSet::new(),
            acked: BTreeSet::new(),
            cursor: HashMap::new(),
        });
        s.groups.insert(group.to_string());
        s.cursor.entry(group.to_string()).or_insert(0);
        Ok(())
    }

    async fn read(
        &self,
        streams: &[String],
        group: &str,
        _consumer: &str,
        _timeout: std::time::Duration,
    ) -> etrap_utils::Result<Vec<StreamEntry>> {
        let mut guard = self.streams.lock().unwrap();
        let mut out = Vec::new();
        for name in streams {
            if let Some(s) = guard.get_mut(name) {
                let cursor = s.cursor.entry(group.to_string()).or_insert(0);
                while *cursor < s.entries.len() {
                    let (id, envelope) = s.entries[*cursor].clone();
                    out.push(StreamEntry {
                        stream_name: name.clone(),
                        entry_id: id,
                        envelope,
                    });
                    *cursor += 1;
                }
            }
        }
        Ok(out)
    }

    async fn ack(&self, _group: &str, entries: &[(String, String)]) -> etrap_utils::Result<()> {
        let mut streams = self.streams.lock().unwrap();
        for (stream, entry_id) in entries {
            if let Some(s) = streams.get_mut(stream) {
                s.acked.insert(entry_id.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn discovers_only_streams_matching_the_pattern() {
        let broker = FakeBroker::new();
        broker.publish("etrap.public.orders", serde_json::json!({}));
        broker.publish("etrap.public.carts", serde_json::json!({}));
        broker.publish("other.db.table", serde_json::json!({}));
        let mut found = broker.discover_streams("etrap.public.*").await.unwrap();
        found.sort();
        assert_eq!(found, vec!["etrap.public.carts", "etrap.public.orders"]);
    }

    #[tokio::test]
    async fn read_is_exactly_once_per_group_cursor() {
        let broker = FakeBroker::new();
        broker.publish("s", serde_json::json!({"op": "c"}));
        broker.ensure_group("s", "g").await.unwrap();
        let first = broker
            .read(&["s".to_string()], "g", "c1", std::time::Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        let second = broker
            .read(&["s".to_string()], "g", "c1", std::time::Duration::from_secs(1))
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn ack_records_entries_by_stream() {
        let broker = FakeBroker::new();
        let id = broker.publish("s", serde_json::json!({}));
        broker.ack("g", &[("s".to_string(), id.clone())]).await.unwrap();
        assert_eq!(broker.acked_entries("s"), vec![id]);
    }
}
