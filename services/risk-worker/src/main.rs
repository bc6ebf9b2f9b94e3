//! Risk output worker.
//!
//! Sequences the blocks of one job: the risk computation itself runs in an
//! external collaborator and leaves its results in the shared store; this
//! worker aggregates them into curve files and loss-map rasters.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use kvstore::{blocks, keys, RedisStore};
use risk_common::{Block, Region, RiskResult};
use risk_output::{OutputConfig, RiskCalculator, RiskOutputCoordinator};

#[derive(Parser, Debug)]
#[command(name = "risk-worker")]
#[command(about = "Output worker for risk calculations")]
struct Args {
    /// Job identifier; scopes every store key
    #[arg(short, long, env = "RISK_JOB_ID")]
    job_id: u64,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://redis:6379")]
    redis_url: String,

    /// Path to the output configuration JSON file
    #[arg(short, long, env = "RISK_OUTPUT_CONFIG")]
    config: String,

    /// Region of interest as min-lon,min-lat,max-lon,max-lat
    #[arg(long, env = "RISK_REGION")]
    region: String,

    /// Computation grid spacing in degrees
    #[arg(long, default_value = "0.1")]
    cell_size: f64,

    /// Cells per computation block
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Worker name (for log attribution)
    #[arg(short, long, env = "WORKER_NAME")]
    name: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Calculator for jobs whose per-asset results are already in the store:
/// computing a block is a no-op, output generation reads what the
/// computation collaborator wrote.
struct PrecomputedResults;

#[async_trait]
impl RiskCalculator for PrecomputedResults {
    async fn compute_block(&self, job_id: u64, block: &Block) -> RiskResult<()> {
        info!(job_id, block_id = block.id, cells = block.len(), "block results precomputed");
        Ok(())
    }
}

fn parse_region(text: &str) -> Result<Region> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|p| p.trim().parse())
        .collect::<Result<_, _>>()?;
    anyhow::ensure!(
        parts.len() == 4,
        "region must be min-lon,min-lat,max-lon,max-lat"
    );

    Ok(Region::from_coordinates(&[
        (parts[0], parts[1]),
        (parts[2], parts[3]),
    ])?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let worker_name = args
        .name
        .unwrap_or_else(|| format!("worker-{}", Uuid::new_v4()));

    info!(name = %worker_name, job_id = args.job_id, "Starting risk output worker");

    let region = parse_region(&args.region)?;
    let grid = region.grid(args.cell_size)?;
    let blocks = Block::split(&grid, args.block_size)?;

    info!(
        rows = grid.rows,
        columns = grid.columns,
        blocks = blocks.len(),
        "Region discretized"
    );

    let store = RedisStore::connect(&args.redis_url).await?;
    let config = OutputConfig::from_file(&args.config)?;

    info!("Connected to key-value store");

    blocks::store_blocks(&store, args.job_id, &blocks).await?;

    let coordinator = RiskOutputCoordinator::new(&store, config, grid)?;
    let summary = coordinator
        .run(&PrecomputedResults, args.job_id, &blocks)
        .await?;

    info!(
        curve_files = summary.curve_files.len(),
        loss_maps = summary.loss_maps.len(),
        failures = summary.failures.len(),
        "Job outputs written"
    );

    if !summary.is_complete() {
        for failure in &summary.failures {
            warn!(%failure, "output file failed");
        }
        anyhow::bail!("{} output file(s) failed", summary.failures.len());
    }

    // outputs are on disk; the job's store keys have served their purpose
    let swept = store.sweep_job(&keys::job_pattern(args.job_id)).await?;
    info!(keys = swept, "Job store keys swept");

    Ok(())
}
