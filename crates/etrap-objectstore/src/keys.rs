use etrap_types::Batch;

/// Computes the five object keys under the organization's bucket for a
/// sealed batch, per the layout in §4.7:
/// `<database>/<table>/<batch_id>/<relative>`, where `<table>` is the
/// batch's canonical table (the first table name in sorted order when
/// the batch covers more than one).
pub fn batch_prefix(batch: &Batch) -> String {
    format!(
        "{}/{}/{}",
        batch.database_name,
        batch.canonical_table(),
        batch.batch_id
    )
}

pub fn object_key(batch: &Batch, relative: &str) -> String {
    format!("{}/{relative}", batch_prefix(batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etrap_types::{BatchId, Indices, MerkleTree};

    fn batch(table_names: Vec<&str>) -> Batch {
        Batch {
            batch_id: BatchId::new("2025-06-14", 1, None),
            created_at_ms: 0,
            organization_id: "org1".to_string(),
            database_name: "shop".to_string(),
            table_names: table_names.into_iter().map(String::from).collect(),
            transactions: vec![],
            tree: MerkleTree {
                algorithm: "sha256".to_string(),
                leaf_hashes: vec![],
                nodes: vec![],
                root: String::new(),
                height: 0,
                proof_index: Default::default(),
            },
            indices: Indices::default(),
        }
    }

    #[test]
    fn single_table_prefix() {
        let b = batch(vec!["orders"]);
        assert_eq!(batch_prefix(&b), format!("shop/orders/{}", b.batch_id));
    }

    #[test]
    fn multi_table_batch_uses_sorted_first_table() {
        let b = batch(vec!["zebras", "apples"]);
        assert_eq!(batch_prefix(&b), format!("shop/apples/{}", b.batch_id));
    }

    #[test]
    fn object_key_appends_relative_path() {
        let b = batch(vec!["orders"]);
        assert_eq!(
            object_key(&b, "batch-data.json"),
            format!("shop/orders/{}/batch-data.json", b.batch_id)
        );
    }
}
