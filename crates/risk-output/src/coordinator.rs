//! Output coordination: compute a block, then materialize curve files and
//! loss-map rasters as an explicit pipeline.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info, info_span, Instrument};

use kvstore::KvStore;
use raster::GeoTiffFile;
use risk_common::{Block, Grid, RiskResult};

use crate::aggregator::SpatialAggregator;
use crate::config::OutputConfig;
use crate::curves::CurveFileWriter;

/// The risk-computation step run once per block. Implementations write
/// their per-asset results to the shared store; output generation reads
/// them back through the aggregator.
#[async_trait]
pub trait RiskCalculator: Send + Sync {
    async fn compute_block(&self, job_id: u64, block: &Block) -> RiskResult<()>;
}

/// Files produced by one output pass. Failed files are listed, not
/// fatal: every output is an independent, deterministically named
/// artifact, so a failure never affects already-written files.
#[derive(Debug, Default)]
pub struct OutputSummary {
    pub curve_files: Vec<PathBuf>,
    pub loss_maps: Vec<PathBuf>,
    pub failures: Vec<String>,
}

impl OutputSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequences computation and output generation for a job.
pub struct RiskOutputCoordinator<'a, S: KvStore> {
    store: &'a S,
    config: OutputConfig,
    grid: Grid,
}

impl<'a, S: KvStore> RiskOutputCoordinator<'a, S> {
    /// `grid` is the computation grid results were stored against.
    /// Creates the output directory up front so every later write is a
    /// plain file write.
    pub fn new(store: &'a S, config: OutputConfig, grid: Grid) -> RiskResult<Self> {
        std::fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            store,
            config,
            grid,
        })
    }

    /// Run the calculator for one block inside its own span, so logs and
    /// failures attribute to the block regardless of where they happen.
    pub async fn process_block(
        &self,
        calculator: &dyn RiskCalculator,
        job_id: u64,
        block: &Block,
    ) -> RiskResult<()> {
        let span = info_span!("compute_block", job_id, block_id = block.id);
        calculator
            .compute_block(job_id, block)
            .instrument(span)
            .await
    }

    /// Materialize all outputs: one curve file and plot per block, one
    /// loss-map raster per configured probability of exceedance. Paths
    /// are deterministic, so re-runs overwrite rather than append.
    pub async fn write_outputs(&self, job_id: u64, blocks: &[Block]) -> RiskResult<OutputSummary> {
        let aggregator = SpatialAggregator::new(self.store);
        let mut summary = OutputSummary::default();

        for block in blocks {
            let path = self.config.curve_path(block.id);
            match self.write_curve_file(&aggregator, job_id, block).await {
                Ok(records) => {
                    info!(path = %path.display(), records, "curve file written");
                    summary.curve_files.push(path);
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "curve file failed");
                    summary.failures.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        for poe in self.config.poes()? {
            let path = self.config.loss_map_path(job_id, poe);
            match self.write_loss_map(&aggregator, job_id, poe).await {
                Ok(()) => {
                    info!(path = %path.display(), poe, "loss map written");
                    summary.loss_maps.push(path);
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "loss map failed");
                    summary.failures.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        Ok(summary)
    }

    /// Compute every block, then write all outputs.
    pub async fn run(
        &self,
        calculator: &dyn RiskCalculator,
        job_id: u64,
        blocks: &[Block],
    ) -> RiskResult<OutputSummary> {
        for block in blocks {
            self.process_block(calculator, job_id, block).await?;
        }
        self.write_outputs(job_id, blocks).await
    }

    async fn write_curve_file(
        &self,
        aggregator: &SpatialAggregator<'_, S>,
        job_id: u64,
        block: &Block,
    ) -> RiskResult<usize> {
        let pairs = aggregator.curves_for_block(job_id, block).await?;
        CurveFileWriter::write_records(self.config.curve_path(block.id), &pairs)?;
        CurveFileWriter::write_plot(self.config.curve_plot_path(block.id), &pairs)?;
        Ok(pairs.len())
    }

    async fn write_loss_map(
        &self,
        aggregator: &SpatialAggregator<'_, S>,
        job_id: u64,
        poe: f64,
    ) -> RiskResult<()> {
        let risk_grid = self.grid.region.grid(self.config.risk_cell_size)?;
        let path = self.config.loss_map_path(job_id, poe);
        let mut writer = GeoTiffFile::loss_map(&path, risk_grid, Some(0.0))?;

        let ratios = aggregator
            .loss_ratios(job_id, poe, &self.grid, &risk_grid)
            .await?;
        for (pixel, ratio) in ratios {
            writer.write((pixel.row, pixel.column), ratio)?;
        }
        writer.close()
    }
}
