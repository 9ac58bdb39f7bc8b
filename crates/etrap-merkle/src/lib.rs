//! C2 (hasher) and C3 (Merkle builder): SHA-256 leaf/raw-data hashing and
//! binary tree construction with full per-leaf proof paths (§4.2, §4.3).

mod hasher;
mod leaf;
mod tree;

pub use hasher::{sha256_hex, sha256_hex_concat};
pub use leaf::build_leaf;
pub use tree::{build_tree, verify_proof, EmptyTree};
