//! Common types shared across the risk-maps crates.

pub mod asset;
pub mod block;
pub mod curve;
pub mod error;
pub mod geo;

pub use asset::Asset;
pub use block::Block;
pub use curve::Curve;
pub use error::{RiskError, RiskResult};
pub use geo::{Grid, GridCell, Region, Site, DEFAULT_CELL_SIZE};
