use serde::{Deserialize, Serialize};

/// The kind of row-level change a [`crate::ChangeEvent`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
    Snapshot,
}

impl OperationKind {
    /// Maps the single-letter `op` field of the CDC envelope (§6) to an
    /// [`OperationKind`]. SNAPSHOT events (`r`, "read") are treated
    /// identically to INSERT downstream (spec open question, decided in
    /// DESIGN.md) but keep their own tag here for indexing by-operation.
    pub fn from_envelope_op(op: &str) -> Option<Self> {
        match op {
            "c" => Some(Self::Insert),
            "u" => Some(Self::Update),
            "d" => Some(Self::Delete),
            "r" => Some(Self::Snapshot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Snapshot => "SNAPSHOT",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
