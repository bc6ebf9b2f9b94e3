//! Error types for the risk-maps crates.

use thiserror::Error;

/// Result type alias using RiskError.
pub type RiskResult<T> = Result<T, RiskError>;

/// Primary error type for risk output operations.
#[derive(Debug, Error)]
pub enum RiskError {
    // === Color table errors ===
    #[error("color table parse error: {0}")]
    Parse(String),

    // === Scaling/validation errors ===
    #[error("invalid scaling bounds: {0}")]
    InvalidBounds(String),

    // === Raster errors ===
    #[error("cell ({row}, {col}) outside {rows}x{columns} raster")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },

    #[error("raster already closed: {0}")]
    RasterClosed(String),

    #[error("raster encoding failed: {0}")]
    Encode(String),

    // === Store errors ===
    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    // === Configuration errors ===
    #[error("config error: {0}")]
    Config(String),

    #[error("region error: {0}")]
    Region(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::Serialization(err.to_string())
    }
}
