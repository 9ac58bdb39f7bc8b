use etrap_types::{MerkleTree, ProofIndex, ProofPath, ProofStep, Side};

use crate::hasher::sha256_hex_concat;

#[derive(Debug, thiserror::Error)]
#[error("cannot build a Merkle tree from zero leaves")]
pub struct EmptyTree;

/// C3: builds a binary tree from an ordered list of leaf hashes,
/// duplicating the last element of any odd-length level before pairing,
/// and records a full proof path per leaf (§4.3).
pub fn build_tree(leaf_hashes: Vec<String>) -> Result<MerkleTree, EmptyTree> {
    if leaf_hashes.is_empty() {
        return Err(EmptyTree);
    }

    let mut levels: Vec<Vec<String>> = vec![leaf_hashes.clone()];
    while levels.last().expect("levels never empty").len() > 1 {
        let current = levels.last().expect("levels never empty");
        let mut padded = current.clone();
        if padded.len() % 2 == 1 {
            let last = padded.last().expect("padded non-empty").clone();
            padded.push(last);
        }
        let next = padded
            .chunks(2)
            .map(|pair| sha256_hex_concat(&pair[0], &pair[1]))
            .collect();
        levels.push(next);
    }

    let height = levels.len() - 1;
    let root = levels[height][0].clone();
    let proof_index = build_proof_index(&levels, leaf_hashes.len(), height);

    Ok(MerkleTree {
        algorithm: "sha256".to_string(),
        leaf_hashes,
        nodes: levels,
        root,
        height,
        proof_index,
    })
}

fn build_proof_index(levels: &[Vec<String>], leaf_count: usize, height: usize) -> ProofIndex {
    let mut proof_index = ProofIndex::new();
    for leaf_index in 0..leaf_count {
        let mut idx = leaf_index;
        let mut path = ProofPath::with_capacity(height);
        for level in levels.iter().take(height) {
            let sibling_idx = idx ^ 1;
            let sibling = if sibling_idx < level.len() {
                level[sibling_idx].clone()
            } else {
                // Odd-length level: the last element was duplicated
                // against itself when this level was built.
                level[idx].clone()
            };
            let position = if idx % 2 == 0 { Side::Right } else { Side::Left };
            path.push(ProofStep { sibling, position });
            idx /= 2;
        }
        proof_index.insert(leaf_index, path);
    }
    proof_index
}

/// The verification contract consumed by the read side (§4.3): replay a
/// leaf's proof path to reproduce the root.
pub fn verify_proof(leaf_hash: &str, path: &ProofPath, root: &str) -> bool {
    let mut current = leaf_hash.to_string();
    for step in path {
        current = match step.position {
            Side::Left => sha256_hex_concat(&step.sibling, &current),
            Side::Right => sha256_hex_concat(&current, &step.sibling),
        };
    }
    current == root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::sha256_hex;

    fn leaves(n: usize) -> Vec<String> {
        (0..n).map(|i| sha256_hex(format!("leaf-{i}").as_bytes())).collect()
    }

    #[test]
    fn single_leaf_tree_has_height_zero_and_empty_proof() {
        let tree = build_tree(leaves(1)).unwrap();
        assert_eq!(tree.height, 0);
        assert_eq!(tree.root, tree.leaf_hashes[0]);
        assert!(tree.proof_index[&0].is_empty());
        assert!(verify_proof(&tree.leaf_hashes[0], &tree.proof_index[&0], &tree.root));
    }

    #[test]
    fn two_leaf_tree_needs_no_duplication() {
        let tree = build_tree(leaves(2)).unwrap();
        assert_eq!(tree.height, 1);
        let expected_root = sha256_hex_concat(&tree.leaf_hashes[0], &tree.leaf_hashes[1]);
        assert_eq!(tree.root, expected_root);
    }

    #[test]
    fn three_leaf_tree_duplicates_the_last_element_at_that_level_only() {
        let ls = leaves(3);
        let tree = build_tree(ls.clone()).unwrap();
        let expected_root = sha256_hex_concat(
            &sha256_hex_concat(&ls[0], &ls[1]),
            &sha256_hex_concat(&ls[2], &ls[2]),
        );
        assert_eq!(tree.root, expected_root);
        assert_eq!(tree.height, 2);
    }

    #[test]
    fn every_leaf_proof_reproduces_the_root() {
        for n in [1usize, 2, 3, 5, 7, 16, 17, 1000] {
            let tree = build_tree(leaves(n)).unwrap();
            for (i, leaf_hash) in tree.leaf_hashes.iter().enumerate() {
                let path = &tree.proof_index[&i];
                assert!(
                    verify_proof(leaf_hash, path, &tree.root),
                    "leaf {i} of {n} failed to verify"
                );
            }
        }
    }

    #[test]
    fn thousand_leaves_tree_has_height_ten() {
        let tree = build_tree(leaves(1000)).unwrap();
        assert_eq!(tree.height, 10);
        assert_eq!(tree.proof_index[&0].len(), 10);
    }

    #[test]
    fn rejects_empty_leaf_list() {
        assert!(build_tree(Vec::new()).is_err());
    }

    #[test]
    fn leaf_index_equals_position_in_leaf_hashes() {
        let tree = build_tree(leaves(10)).unwrap();
        for (i, _) in tree.leaf_hashes.iter().enumerate() {
            assert!(tree.proof_index.contains_key(&i));
        }
    }
}
