use async_trait::async_trait;
use redis::AsyncCommands;

use crate::broker::StreamBroker;
use crate::entry::StreamEntry;

/// Production [`StreamBroker`] backed by Redis Streams (§4.5/§6):
/// `SCAN` for discovery (glob-matched), `XGROUP CREATE ... $ MKSTREAM`
/// to join at the earliest unread position idempotently, `XREADGROUP`
/// for the blocking multi-stream read, and `XACK` on commit.
pub struct RedisBroker {
    manager: redis::aio::ConnectionManager,
}

impl RedisBroker {
    pub async fn connect(host: &str, port: u16, password: Option<&str>) -> etrap_utils::Result<Self> {
        let url = match password {
            Some(p) => format!("redis://:{p}@{host}:{port}"),
            None => format!("redis://{host}:{port}"),
        };
        let client = redis::Client::open(url)
            .map_err(|e| etrap_utils::Error::BrokerUnavailable(e.to_string()))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| etrap_utils::Error::BrokerUnavailable(e.to_string()))?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl StreamBroker for RedisBroker {
    async fn discover_streams(&self, pattern: &str) -> etrap_utils::Result<Vec<String>> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| etrap_utils::Error::ConfigurationError(e.to_string()))?;
        let mut conn = self.manager.clone();
        let mut found = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("*")
                .arg("TYPE")
                .arg("stream")
                .query_async(&mut conn)
                .await
                .map_err(|e| etrap_utils::Error::BrokerUnavailable(e.to_string()))?;
            found.extend(keys.into_iter().filter(|k| glob_pattern.matches(k)));
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        found.sort();
        found.dedup();
        Ok(found)
    }

    async fn ensure_group(&self, stream: &str, group: &str) -> etrap_utils::Result<()> {
        let mut conn = self.manager.clone();
        let result: redis::RedisResult<()> = conn
            .xgroup_create_mkstream(stream, group, "0")
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.to_string().contains("BUSYGROUP") => Ok(()),
            Err(e) => Err(etrap_utils::Error::BrokerUnavailable(e.to_string())),
        }
    }

    async fn read(
        &self,
        streams: &[String],
        group: &str,
        consumer: &str,
        timeout: std::time::Duration,
    ) -> etrap_utils::Result<Vec<StreamEntry>> {
        let mut conn = self.manager.clone();
        let ids: Vec<&str> = streams.iter().map(|_| ">").collect();
        let opts = redis::streams::StreamReadOptions::default()
            .group(group, consumer)
            .block(timeout.as_millis() as usize);
        let reply: redis::streams::StreamReadReply = conn
            .xread_options(streams, &ids, &opts)
            .await
            .map_err(|e| etrap_utils::Error::BrokerUnavailable(e.to_string()))?;
        let mut out = Vec::new();
        for key in reply.keys {
            for id in key.ids {
                let raw = id
                    .map
                    .get("value")
                    .and_then(|v| match v {
                        redis::Value::Data(bytes) => Some(bytes.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();
                let envelope: serde_json::Value =
                    serde_json::from_slice(&raw).unwrap_or(serde_json::Value::Null);
                out.push(StreamEntry {
                    stream_name: key.key.clone(),
                    entry_id: id.id,
                    envelope,
                });
            }
        }
        Ok(out)
    }

    async fn ack(&self, group: &str, entries: &[(String, String)]) -> etrap_utils::Result<()> {
        let mut conn = self.manager.clone();
        for (stream, entry_id) in entries {
            let _: i64 = conn
                .xack(stream, group, &[entry_id.as_str()])
                .await
                .map_err(|e| etrap_utils::Error::BrokerUnavailable(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "needs redis"]
    async fn connects_discovers_and_round_trips_an_entry_against_a_real_redis() {
        let broker = RedisBroker::connect("localhost", 6379, None).await.unwrap();
        let stream = "etrap.public.integration_test";
        let mut conn = broker.manager.clone();
        let _: String = redis::cmd("XADD")
            .arg(stream)
            .arg("*")
            .arg("value")
            .arg(r#"{"op":"c","ts_ms":1,"source":{"db":"shop","table":"orders"},"after":{"id":1}}"#)
            .query_async(&mut conn)
            .await
            .unwrap();

        let streams = broker.discover_streams("etrap.public.*").await.unwrap();
        assert!(streams.contains(&stream.to_string()));

        broker.ensure_group(stream, "etrap-agent").await.unwrap();
        let entries = broker
            .read(
                &[stream.to_string()],
                "etrap-agent",
                "consumer-1",
                std::time::Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        broker
            .ack("etrap-agent", &[(stream.to_string(), entries[0].entry_id.clone())])
            .await
            .unwrap();
    }
}
