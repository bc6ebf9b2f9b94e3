//! Backend-agnostic key-value interface.

use async_trait::async_trait;
use bytes::Bytes;

use risk_common::RiskResult;

/// Async key-value store with string keys, opaque values, and lists.
///
/// Calculators write asset lists, curves and conditional losses through
/// this trait; output components read them back. Missing keys are `None`
/// or an empty list, never an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read one value.
    async fn get(&self, key: &str) -> RiskResult<Option<Bytes>>;

    /// Write one value, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> RiskResult<()>;

    /// Read a whole list in insertion order.
    async fn get_list(&self, key: &str) -> RiskResult<Vec<Bytes>>;

    /// Append one element to a list, creating it if absent.
    async fn push_list(&self, key: &str, value: &[u8]) -> RiskResult<()>;
}
