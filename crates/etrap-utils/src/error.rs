use etrap_types::BatchId;

/// The error kinds and their disposition from §7. Each variant names the
/// component that raises it; the orchestrator matches on these to decide
/// whether to ack, retry, or drop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// C1: the envelope couldn't be parsed at all. Disposition: log, drop
    /// the single event, ack its entry — never stalls the batch.
    #[error("malformed event on stream {stream}: {reason}")]
    MalformedEvent { stream: String, reason: String },

    /// C5: the broker is unreachable. Disposition: retry with backoff
    /// indefinitely, no ack.
    #[error("broker unavailable: {0}")]
    BrokerUnavailable(String),

    /// C7: one or more artifact uploads failed. Disposition: best-effort
    /// cleanup of partial objects, no ack, retried with a new batch id.
    #[error("object store upload failed for batch {batch_id}: {reason}")]
    ObjectStoreUploadFailed {
        batch_id: BatchId,
        reason: String,
    },

    /// C8: mint failed after exhausting retries. Disposition: artifacts
    /// remain, no ack, events redelivered.
    #[error("mint failed for batch {batch_id} after {attempts} attempts: {reason}")]
    MintFailed {
        batch_id: BatchId,
        attempts: u32,
        reason: String,
    },

    /// Startup-time misconfiguration. Disposition: fatal, non-zero exit.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
