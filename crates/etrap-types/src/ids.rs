use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BATCH_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^BATCH-\d{4}-\d{2}-\d{2}-[0-9a-f]{8}(-T\d+)?$").unwrap()
});

/// `BATCH-YYYY-MM-DD-<hex8>[-T<n>]`, validated at construction so a
/// malformed id can't silently flow into an object-store key or a
/// blockchain token id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BatchId(String);

#[derive(Debug, thiserror::Error)]
#[error("invalid batch id '{0}', expected BATCH-YYYY-MM-DD-<hex8>[-T<n>]")]
pub struct InvalidBatchId(String);

impl BatchId {
    pub fn new(date: &str, shard: u32, suffix: Option<u32>) -> Self {
        let base = format!("BATCH-{date}-{shard:08x}");
        let id = match suffix {
            Some(n) => format!("{base}-T{n}"),
            None => base,
        };
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY-MM-DD` component, used as the by-date index key prefix.
    pub fn date(&self) -> &str {
        &self.0["BATCH-".len()..][..10]
    }
}

impl TryFrom<String> for BatchId {
    type Error = InvalidBatchId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if BATCH_ID_RE.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidBatchId(value))
        }
    }
}

impl From<BatchId> for String {
    fn from(value: BatchId) -> Self {
        value.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<batch-id>-<leaf-index>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(batch_id: &BatchId, leaf_index: usize) -> Self {
        Self(format!("{batch_id}-{leaf_index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
