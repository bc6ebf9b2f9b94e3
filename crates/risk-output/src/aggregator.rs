//! Spatial aggregation of per-asset results from the shared store.

use tracing::debug;

use kvstore::{keys, KvStore};
use risk_common::{Asset, Block, Curve, Grid, GridCell, RiskResult, Site};

/// Walks grid points, joins the asset list at each point with the results
/// the risk computation stored for those assets, and yields ordered
/// (site, result) pairs.
///
/// Missing results are a valid terminal state: the computation may not
/// produce a curve or loss for every asset, so absent keys are skipped,
/// never an error. Store failures propagate.
pub struct SpatialAggregator<'a, S: KvStore> {
    store: &'a S,
}

impl<'a, S: KvStore> SpatialAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Decode the asset list stored at one grid cell.
    async fn assets_at(&self, job_id: u64, cell: GridCell) -> RiskResult<Vec<Asset>> {
        let raw = self
            .store
            .get_list(&keys::asset_key(job_id, cell.row, cell.column))
            .await?;

        let mut assets = Vec::with_capacity(raw.len());
        for entry in raw {
            assets.push(serde_json::from_slice(&entry)?);
        }
        Ok(assets)
    }

    /// All (site, loss-ratio curve) pairs for one block, in block cell
    /// order then asset order. Assets with no stored curve contribute
    /// nothing.
    pub async fn curves_for_block(
        &self,
        job_id: u64,
        block: &Block,
    ) -> RiskResult<Vec<(Site, Curve)>> {
        let mut out = Vec::new();

        for &cell in &block.cells {
            for asset in self.assets_at(job_id, cell).await? {
                let key = keys::loss_ratio_key(job_id, cell.row, cell.column, &asset.asset_id);
                match self.store.get(&key).await? {
                    Some(raw) => {
                        let curve: Curve = serde_json::from_slice(&raw)?;
                        out.push((asset.site(), curve));
                    }
                    None => {
                        debug!(asset = %asset.asset_id, "no curve stored, skipping");
                    }
                }
            }
        }

        Ok(out)
    }

    /// Region-wide loss ratios at one probability of exceedance, addressed
    /// as pixels of the (possibly finer) risk grid.
    ///
    /// For each asset: ratio = scalar loss / asset value; the asset's own
    /// site picks the target pixel. Co-located assets overwrite each other
    /// in iteration order; callers render the pairs as delivered. An asset
    /// with a non-positive recorded value has no meaningful ratio and is
    /// skipped like a missing result.
    pub async fn loss_ratios(
        &self,
        job_id: u64,
        poe: f64,
        grid: &Grid,
        risk_grid: &Grid,
    ) -> RiskResult<Vec<(GridCell, f64)>> {
        let mut out = Vec::new();

        for cell in grid.cells() {
            for asset in self.assets_at(job_id, cell).await? {
                if asset.value <= 0.0 {
                    debug!(asset = %asset.asset_id, value = asset.value, "non-positive asset value, skipping");
                    continue;
                }

                let key = keys::loss_key(job_id, cell.row, cell.column, &asset.asset_id, poe);
                let Some(raw) = self.store.get(&key).await? else {
                    continue;
                };

                let loss: f64 = serde_json::from_slice(&raw)?;
                let ratio = loss / asset.value;
                let pixel = risk_grid.point_at(asset.site())?;
                out.push((pixel, ratio));
            }
        }

        Ok(out)
    }
}
