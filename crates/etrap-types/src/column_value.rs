use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single column's value after the canonicalizer has decoded it.
///
/// `before`/`after` images on the wire carry untyped JSON; this is the
/// typed form the rest of the pipeline (hashing, artifact assembly)
/// consumes. See `etrap-canonical` for the decoding rules that produce
/// these from a [`serde_json::Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ColumnValue {
    String(String),
    Integer(i128),
    /// A decimal or oversized integer, kept as its canonical decimal string.
    Decimal(String),
    Bool(bool),
    Null,
    /// `YYYY-MM-DDTHH:MM:SS.mmm`, millisecond precision, no timezone suffix
    /// unless the source carried one.
    Timestamp(String),
    /// A value that didn't decode into anything more specific.
    Opaque(Vec<u8>),
}

/// An ordered-by-key column map, i.e. one row image (`before` or `after`).
pub type ColumnMap = BTreeMap<String, ColumnValue>;
