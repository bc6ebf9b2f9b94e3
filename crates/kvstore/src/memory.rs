//! In-memory store for tests and single-process runs.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use risk_common::RiskResult;

use crate::store::KvStore;

/// HashMap-backed store with the same semantics as the Redis backend:
/// last write wins, lists keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Bytes>>,
    lists: RwLock<HashMap<String, Vec<Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> RiskResult<Option<Bytes>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> RiskResult<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), Bytes::copy_from_slice(value));
        Ok(())
    }

    async fn get_list(&self, key: &str) -> RiskResult<Vec<Bytes>> {
        Ok(self
            .lists
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn push_list(&self, key: &str, value: &[u8]) -> RiskResult<()> {
        self.lists
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .push(Bytes::copy_from_slice(value));
        Ok(())
    }
}
