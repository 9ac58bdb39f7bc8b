use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A stable per-`(organization, database, table)` shard id used as the
/// `<hex8>` component of a batch id. Deterministic (not random) so
/// batch ids are reproducible in tests and so two agents sharding the
/// same table land on the same prefix.
pub(crate) fn shard_for(organization_id: &str, database: &str, table: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    organization_id.hash(&mut hasher);
    database.hash(&mut hasher);
    table.hash(&mut hasher);
    (hasher.finish() & 0xFFFF_FFFF) as u32
}
