use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One sibling hash on a leaf's path to the root, and which side it sits
/// on relative to the node being combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: String,
    pub position: Side,
}

/// Sibling hashes and positions from one leaf to the root, one entry per
/// level above 0. Empty for a single-leaf tree.
pub type ProofPath = Vec<ProofStep>;

/// `leaf_index -> proof path`, persisted alongside the tree so a verifier
/// can check one leaf without recomputing the whole structure.
pub type ProofIndex = BTreeMap<usize, ProofPath>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleLeaf {
    pub index: usize,
    pub leaf_hash: String,
    pub raw_data_hash: String,
}

/// An ordered list of leaf hashes, the derived layers above them, the
/// root, and the per-leaf proof index (§3, §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    pub algorithm: String,
    pub leaf_hashes: Vec<String>,
    /// `nodes[0]` is the leaf layer, `nodes[height]` is `[root]`.
    pub nodes: Vec<Vec<String>>,
    pub root: String,
    pub height: usize,
    pub proof_index: ProofIndex,
}
