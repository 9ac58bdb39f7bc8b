use async_trait::async_trait;

use crate::entry::StreamEntry;

/// C5's capability seam onto the broker (§4.5). A production adapter
/// talks to Redis Streams; tests run against [`crate::fake::FakeBroker`].
#[async_trait]
pub trait StreamBroker: Send + Sync {
    /// Lists stream names currently known to the broker that match
    /// `pattern` (a glob, e.g. `etrap.public.*`).
    async fn discover_streams(&self, pattern: &str) -> etrap_utils::Result<Vec<String>>;

    /// Creates `group` on `stream` at the earliest position if it does
    /// not already exist. Idempotent.
    async fn ensure_group(&self, stream: &str, group: &str) -> etrap_utils::Result<()>;

    /// Blocking multi-stream read capped at `timeout`. An empty result
    /// is a normal, expected outcome (not an error) and drives the
    /// idle-trigger evaluation in the orchestrator.
    async fn read(
        &self,
        streams: &[String],
        group: &str,
        consumer: &str,
        timeout: std::time::Duration,
    ) -> etrap_utils::Result<Vec<StreamEntry>>;

    /// Acknowledges the given `(stream, entry_id)` pairs against `group`.
    /// Called only once the batch they fed has been fully committed.
    async fn ack(
        &self,
        group: &str,
        entries: &[(String, String)],
    ) -> etrap_utils::Result<()>;
}
