use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::ObjectStore;

/// An in-process object store used by tests: keyed by `(bucket, key)`,
/// with no concept of regions or bucket creation. `fail_on` lets a test
/// inject an upload failure partway through a batch to exercise the
/// publisher's cleanup path.
#[derive(Default)]
pub struct FakeObjectStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    fail_on: Mutex<BTreeSet<String>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every future `put_object` whose key contains `pattern` fails.
    pub fn fail_on(&self, pattern: &str) {
        self.fail_on.lock().unwrap().insert(pattern.to_string());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.get(bucket, key).is_some()
    }

    pub fn keys_under(&self, bucket: &str, prefix: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, bytes: &[u8]) -> etrap_utils::Result<()> {
        if self
            .fail_on
            .lock()
            .unwrap()
            .iter()
            .any(|pattern| key.contains(pattern.as_str()))
        {
            return Err(etrap_utils::Error::Other(anyhow::anyhow!(
                "fake upload failure for {key}"
            )));
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), bytes.to_vec());
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> etrap_utils::Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
