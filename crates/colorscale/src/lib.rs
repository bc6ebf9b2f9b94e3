//! Color scales for raster output: colormaps, CPT parsing and value
//! scaling policies.

pub mod builtin;
pub mod colormap;
pub mod cpt;
pub mod scaling;

pub use colormap::{Colormap, MapKind, Rgb};
pub use cpt::{parse_cpt, CptReader};
pub use scaling::{Scaling, ScalingMode};
