use etrap_types::{ChangeEvent, RawEnvelope};

use crate::entry::StreamEntry;

/// Parses one raw entry into a [`ChangeEvent`]. A malformed envelope is
/// the C1 `MalformedEvent` disposition (§7): the caller logs and drops
/// the single event, still acknowledging its entry, without stalling
/// the rest of the read batch.
pub fn decode_entry(entry: StreamEntry) -> Result<ChangeEvent, etrap_utils::Error> {
    let envelope: RawEnvelope =
        serde_json::from_value(entry.envelope).map_err(|e| etrap_utils::Error::MalformedEvent {
            stream: entry.stream_name.clone(),
            reason: e.to_string(),
        })?;
    ChangeEvent::from_envelope(entry.stream_name.clone(), entry.entry_id, envelope).map_err(|e| {
        etrap_utils::Error::MalformedEvent {
            stream: entry.stream_name,
            reason: e.to_string(),
        }
    })
}
