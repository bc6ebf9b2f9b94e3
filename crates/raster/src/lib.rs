//! Georeferenced raster output.
//!
//! `GeoTiffFile` maps grid cells to pixels, colors values through a
//! colormap under a scaling policy, and emits a 4-band (RGBA) GeoTIFF on
//! close. The TIFF container itself is encoded byte-by-byte in
//! `encoder`; no external raster library is involved.

pub mod bands;
pub mod encoder;
pub mod writer;

pub use bands::RasterBands;
pub use writer::{GeoTiffFile, GeoTransform};
