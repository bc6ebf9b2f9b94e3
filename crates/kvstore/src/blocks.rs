//! Block descriptors in the shared store.
//!
//! The worker that partitions the region records every block under the job
//! namespace, so any process holding the job id can enumerate and fetch the
//! same blocks it is generating outputs for.

use tracing::debug;

use risk_common::{Block, RiskResult};

use crate::keys;
use crate::store::KvStore;

/// Record the blocks of a job: each descriptor under its own key, plus the
/// ordered id list. Re-registering a block overwrites its descriptor.
pub async fn store_blocks<S: KvStore>(
    store: &S,
    job_id: u64,
    blocks: &[Block],
) -> RiskResult<()> {
    for block in blocks {
        store
            .set(
                &keys::block_key(job_id, block.id),
                &serde_json::to_vec(block)?,
            )
            .await?;
        store
            .push_list(&keys::blocks_key(job_id), &serde_json::to_vec(&block.id)?)
            .await?;
    }
    Ok(())
}

/// Load every block registered for a job, in registration order. An id
/// with no descriptor is skipped.
pub async fn load_blocks<S: KvStore>(store: &S, job_id: u64) -> RiskResult<Vec<Block>> {
    let mut blocks = Vec::new();
    for raw in store.get_list(&keys::blocks_key(job_id)).await? {
        let id: u32 = serde_json::from_slice(&raw)?;
        match store.get(&keys::block_key(job_id, id)).await? {
            Some(raw_block) => blocks.push(serde_json::from_slice(&raw_block)?),
            None => debug!(job_id, block_id = id, "block id registered without descriptor"),
        }
    }
    Ok(blocks)
}
