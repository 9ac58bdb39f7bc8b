//! Deterministic JSON bytes for anything serializable whose maps are
//! already key-ordered (`BTreeMap`, or a struct with a fixed field
//! order). `serde_json`'s compact writer never inserts insignificant
//! whitespace, so ordering the maps is the only thing callers need to
//! get right for §4.1/§4.6's "stable serialization" requirement.
use serde::Serialize;

pub fn to_bytes<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(value)
}
