//! Structured lifecycle events, grounded on the teacher's
//! `webb_relayer_utils::probe` module: a single `tracing` target plus a
//! `Kind` enum, so a log pipeline can build dashboards/alerts off
//! `tracing::event!` calls without the core exposing its own metrics
//! endpoint.

use std::fmt;

pub const TARGET: &str = "etrap_probe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A batch buffer sealed and is ready for artifact composition.
    BatchSealed,
    /// All three object-store documents for a batch were uploaded.
    ArtifactsPublished,
    /// The anchor token was minted (or confirmed already minted).
    TokenMinted,
    /// Broker entries were acknowledged for a committed batch.
    EntriesAcked,
    /// A read from the broker returned no events.
    EmptyRead,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::BatchSealed => "batch_sealed",
            Kind::ArtifactsPublished => "artifacts_published",
            Kind::TokenMinted => "token_minted",
            Kind::EntriesAcked => "entries_acked",
            Kind::EmptyRead => "empty_read",
        };
        f.write_str(s)
    }
}
