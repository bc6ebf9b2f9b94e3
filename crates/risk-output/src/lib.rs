//! Risk output generation: spatial aggregation of computed results from the
//! shared store into curve files and loss-map rasters.

pub mod aggregator;
pub mod config;
pub mod coordinator;
pub mod curves;

pub use aggregator::SpatialAggregator;
pub use config::OutputConfig;
pub use coordinator::{OutputSummary, RiskCalculator, RiskOutputCoordinator};
pub use curves::{CurveFileWriter, CurveRecord};
