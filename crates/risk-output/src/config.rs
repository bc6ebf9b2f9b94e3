//! Output configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use risk_common::{RiskError, RiskResult, DEFAULT_CELL_SIZE};

fn default_poes() -> String {
    "0.01".to_string()
}

fn default_prefix() -> String {
    "loss-curves".to_string()
}

fn default_risk_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

/// Output settings loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory all output files land in.
    pub output_dir: PathBuf,

    /// Filename prefix for curve files.
    #[serde(default = "default_prefix")]
    pub curve_prefix: String,

    /// Conditional-loss probabilities of exceedance, space-separated.
    #[serde(default = "default_poes")]
    pub conditional_loss_poes: String,

    /// Cell size of the loss-map raster grid, in degrees. May be finer
    /// than the computation grid.
    #[serde(default = "default_risk_cell_size")]
    pub risk_cell_size: f64,
}

impl OutputConfig {
    /// Load configuration from a JSON string and validate it.
    pub fn from_json(json_str: &str) -> RiskResult<Self> {
        let config: Self = serde_json::from_str(json_str)
            .map_err(|e| RiskError::Config(format!("invalid output config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> RiskResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> RiskResult<()> {
        if !(self.risk_cell_size.is_finite() && self.risk_cell_size > 0.0) {
            return Err(RiskError::Config(format!(
                "risk_cell_size must be positive, got {}",
                self.risk_cell_size
            )));
        }
        self.poes()?;
        Ok(())
    }

    /// The configured probabilities of exceedance, parsed and validated.
    pub fn poes(&self) -> RiskResult<Vec<f64>> {
        let mut poes = Vec::new();
        for token in self.conditional_loss_poes.split_whitespace() {
            let poe: f64 = token.parse().map_err(|_| {
                RiskError::Config(format!("'{}' is not a probability", token))
            })?;
            if !(0.0..=1.0).contains(&poe) {
                return Err(RiskError::Config(format!(
                    "probability of exceedance {} outside [0, 1]",
                    poe
                )));
            }
            poes.push(poe);
        }

        if poes.is_empty() {
            return Err(RiskError::Config(
                "no probabilities of exceedance configured".to_string(),
            ));
        }
        Ok(poes)
    }

    /// Curve file path for one block.
    pub fn curve_path(&self, block_id: u32) -> PathBuf {
        self.output_dir
            .join(format!("{}-block-{}.json", self.curve_prefix, block_id))
    }

    /// Curve plot path for one block.
    pub fn curve_plot_path(&self, block_id: u32) -> PathBuf {
        self.output_dir
            .join(format!("{}-block-{}.svg", self.curve_prefix, block_id))
    }

    /// Loss-map raster path for one probability of exceedance.
    pub fn loss_map_path(&self, job_id: u64, poe: f64) -> PathBuf {
        self.output_dir
            .join(format!("{}-losses_at-{}.tiff", job_id, poe))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            curve_prefix: default_prefix(),
            conditional_loss_poes: default_poes(),
            risk_cell_size: default_risk_cell_size(),
        }
    }
}
