//! C1: turns a [`etrap_types::ChangeEvent`]'s raw before/after images into
//! a deterministic byte string suitable for hashing (§4.1).

mod numeric;
mod timestamp;

use etrap_types::{CanonicalPayload, ChangeEvent, ColumnMap, ColumnValue, RawColumnMap};

pub use numeric::decode_base64_integer;
pub use timestamp::normalize_timestamp;

/// Decodes one raw JSON value into its canonical [`ColumnValue`]. Never
/// fails: anything that doesn't decode as a recognized shape falls back
/// to [`ColumnValue::String`]/[`ColumnValue::Opaque`] (§4.1, "never
/// fails on unknown columns").
pub fn canonicalize_value(value: &serde_json::Value) -> ColumnValue {
    match value {
        serde_json::Value::Null => ColumnValue::Null,
        serde_json::Value::Bool(b) => ColumnValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ColumnValue::Integer(i as i128)
            } else if let Some(u) = n.as_u64() {
                ColumnValue::Integer(u as i128)
            } else {
                ColumnValue::Decimal(n.to_string())
            }
        }
        serde_json::Value::String(s) => {
            if let Some(decimal) = decode_base64_integer(s) {
                tracing::trace!(source = %s, decoded = %decimal, "decoded base64 numeric column");
                ColumnValue::Decimal(decimal)
            } else if let Some(iso) = normalize_timestamp(s) {
                ColumnValue::Timestamp(iso)
            } else {
                ColumnValue::String(s.clone())
            }
        }
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            ColumnValue::Opaque(serde_json::to_vec(value).unwrap_or_default())
        }
    }
}

fn canonicalize_column_map(raw: &RawColumnMap) -> ColumnMap {
    raw.iter()
        .map(|(k, v)| (k.clone(), canonicalize_value(v)))
        .collect()
}

/// Decodes a `ChangeEvent`'s before/after images into their canonical
/// form. Key order is already canonical since [`RawColumnMap`] is a
/// `BTreeMap` (§4.1 invariant: permuting input column order never
/// changes the result).
pub fn canonicalize_event(event: &ChangeEvent) -> CanonicalPayload {
    CanonicalPayload {
        before: event.before.as_ref().map(canonicalize_column_map),
        after: event.after.as_ref().map(canonicalize_column_map),
    }
}

/// The canonical byte string fed to the hasher for a payload's
/// raw-data hash (§4.1/§4.2): stable-serialized JSON, sorted keys,
/// fixed separators, no trailing newline.
pub fn canonical_payload_bytes(payload: &CanonicalPayload) -> Vec<u8> {
    etrap_types::stable_json::to_bytes(payload).expect("CanonicalPayload always serializes")
}
