use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::operation::OperationKind;

/// A raw column map as it arrives on the wire: column name to an untyped
/// JSON value, which may be a plain scalar or a base64-encoded numeric
/// per §4.1. Kept as a `BTreeMap` so key order is already canonical
/// (satisfies the canonicalizer's order-insensitivity invariant for free).
pub type RawColumnMap = BTreeMap<String, serde_json::Value>;

/// The wire shape of one entry's `value` field (§6): at least `op`,
/// `ts_ms`, `source.db`, `source.table`, and optional `before`/`after`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    pub op: String,
    pub ts_ms: i64,
    pub source: RawSource,
    #[serde(default)]
    pub before: Option<RawColumnMap>,
    #[serde(default)]
    pub after: Option<RawColumnMap>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSource {
    pub db: String,
    pub table: String,
    /// Everything else the producer attached to `source` travels with the
    /// event as opaque metadata; the core never interprets it.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("unrecognized operation code '{0}'")]
    UnknownOp(String),
    #[error("failed to parse envelope json: {0}")]
    Json(#[from] serde_json::Error),
}

/// One CDC record consumed from a stream (§3). Lives from the point it's
/// read off the broker until the batch containing it is acknowledged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub stream_name: String,
    /// Opaque broker entry id, used only for acknowledgement.
    pub entry_id: String,
    pub operation: OperationKind,
    pub source_ts_ms: i64,
    pub database: String,
    pub table: String,
    pub before: Option<RawColumnMap>,
    pub after: Option<RawColumnMap>,
    pub source_metadata: serde_json::Value,
}

impl ChangeEvent {
    pub fn from_envelope(
        stream_name: String,
        entry_id: String,
        envelope: RawEnvelope,
    ) -> Result<Self, EnvelopeError> {
        let operation = OperationKind::from_envelope_op(&envelope.op)
            .ok_or_else(|| EnvelopeError::UnknownOp(envelope.op.clone()))?;
        let source_metadata = serde_json::Value::Object(envelope.source.extra);
        Ok(Self {
            stream_name,
            entry_id,
            operation,
            source_ts_ms: envelope.ts_ms,
            database: envelope.source.db,
            table: envelope.source.table,
            before: envelope.before,
            after: envelope.after,
            source_metadata,
        })
    }

    /// `(database, table)`, the batch accumulator's buffer key.
    pub fn buffer_key(&self) -> (&str, &str) {
        (&self.database, &self.table)
    }
}
