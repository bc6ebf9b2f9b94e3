//! Key schema for risk calculation data.
//!
//! Every key is namespaced under the job identifier so concurrent jobs
//! never collide and a finished job can be swept with one pattern.

/// List of serialized assets at one grid cell.
pub fn asset_key(job_id: u64, row: usize, column: usize) -> String {
    format!("risk:{}:asset:{}:{}", job_id, row, column)
}

/// Loss ratio curve for one asset at one grid cell.
pub fn loss_ratio_key(job_id: u64, row: usize, column: usize, asset_id: &str) -> String {
    format!("risk:{}:loss_ratio:{}:{}:{}", job_id, row, column, asset_id)
}

/// Conditional loss for one asset at one probability of exceedance.
pub fn loss_key(job_id: u64, row: usize, column: usize, asset_id: &str, poe: f64) -> String {
    format!("risk:{}:loss:{}:{}:{}:{}", job_id, row, column, asset_id, poe)
}

/// Serialized cell membership of one computation block.
pub fn block_key(job_id: u64, block_id: u32) -> String {
    format!("risk:{}:block:{}", job_id, block_id)
}

/// List of block identifiers belonging to a job.
pub fn blocks_key(job_id: u64) -> String {
    format!("risk:{}:blocks", job_id)
}

/// Pattern matching every key a job owns.
pub fn job_pattern(job_id: u64) -> String {
    format!("risk:{}:*", job_id)
}
