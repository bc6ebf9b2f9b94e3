//! Raster writers: grid-addressed, colormap-driven GeoTIFF output.

use std::path::{Path, PathBuf};

use tracing::debug;

use colorscale::{builtin, Colormap, Scaling, ScalingMode};
use risk_common::{Grid, GridCell, RiskError, RiskResult};

use crate::bands::RasterBands;
use crate::encoder;

/// GDAL-style geotransform:
/// (origin_lon, pixel_width, 0, origin_lat, 0, pixel_height).
/// Pixel height is negative: raster rows increase southward.
pub type GeoTransform = (f64, f64, f64, f64, f64, f64);

/// Pixel storage strategy.
///
/// Fixed-scaling writers resolve colors at write time; relative or
/// normalized writers must keep raw values until close, when the full
/// value population is known.
enum Payload {
    Immediate(RasterBands),
    Deferred { values: Vec<f64>, written: Vec<bool> },
}

enum State {
    Open,
    Closed,
}

/// A georeferenced 4-band raster file under construction.
///
/// Lifecycle: OPEN at creation, any number of `write` calls, then one
/// `close` which finalizes colors and emits the file. Writing after close
/// is an error; a second close is a no-op.
pub struct GeoTiffFile {
    path: PathBuf,
    grid: Grid,
    colormap: Colormap,
    scaling: Scaling,
    normalize: bool,
    payload: Payload,
    state: State,
}

impl GeoTiffFile {
    /// Fully general constructor: explicit colormap, scaling and
    /// normalization. `init_value` pre-fills every cell so no pixel is
    /// left undefined.
    pub fn colored(
        path: impl AsRef<Path>,
        grid: Grid,
        colormap: Colormap,
        scaling: Scaling,
        normalize: bool,
        init_value: Option<f64>,
    ) -> RiskResult<Self> {
        colormap.validate()?;
        if !colormap.is_rgb() {
            return Err(RiskError::Parse(format!(
                "color model '{}' is not renderable",
                colormap.model
            )));
        }

        let size = grid.len();
        let payload = match (&scaling, normalize) {
            (Scaling::Fixed { .. }, false) => Payload::Immediate(RasterBands::new(
                grid.rows,
                grid.columns,
            )),
            _ => Payload::Deferred {
                values: vec![f64::NAN; size],
                written: vec![false; size],
            },
        };

        let mut writer = Self {
            path: path.as_ref().to_path_buf(),
            grid,
            colormap,
            scaling,
            normalize,
            payload,
            state: State::Open,
        };

        if let Some(value) = init_value {
            for cell in grid.cells().collect::<Vec<_>>() {
                writer.write((cell.row, cell.column), value)?;
            }
        }

        Ok(writer)
    }

    /// Plain monochrome raster: values scale relative to the observed
    /// range, colored black to white.
    pub fn plain(path: impl AsRef<Path>, grid: Grid, init_value: Option<f64>) -> RiskResult<Self> {
        Self::colored(
            path,
            grid,
            builtin::monochrome(),
            Scaling::relative(),
            false,
            init_value,
        )
    }

    /// Ground-motion-field raster: fixed scaling over the colormap's own
    /// breakpoints, or over a caller-supplied IML list; discrete or
    /// continuous coloring as requested.
    pub fn ground_motion(
        path: impl AsRef<Path>,
        grid: Grid,
        colormap: Colormap,
        iml_list: Option<&[f64]>,
        discrete: bool,
    ) -> RiskResult<Self> {
        let effective = match iml_list {
            Some(list) => colormap.with_breakpoints(list, discrete)?,
            None if discrete != matches!(colormap.kind, colorscale::MapKind::Discrete) => {
                let breakpoints = colormap.z_values.clone();
                colormap.with_breakpoints(&breakpoints, discrete)?
            }
            None => colormap,
        };

        let min = effective.z_values[0];
        let max = *effective.z_values.last().unwrap_or(&min);
        let scaling = Scaling::fixed(min, max)?;

        Self::colored(path, grid, effective, scaling, false, None)
    }

    /// Hazard-map raster. `iml_min_max` arrives as opaque configuration
    /// text; a supplied pair must be two finite, non-negative, ascending
    /// numbers or construction fails before any I/O. Without a pair the
    /// writer falls back to relative scaling.
    pub fn hazard_map(
        path: impl AsRef<Path>,
        grid: Grid,
        colormap: Colormap,
        iml_min_max: Option<(&str, &str)>,
    ) -> RiskResult<Self> {
        let scaling = match iml_min_max {
            Some((min, max)) => parse_iml_bounds(min, max)?,
            None => Scaling::relative(),
        };
        Self::colored(path, grid, colormap, scaling, false, None)
    }

    /// Loss-map raster: relative scaling with normalization against the
    /// observed maximum, producing a bounded ratio image.
    pub fn loss_map(
        path: impl AsRef<Path>,
        grid: Grid,
        init_value: Option<f64>,
    ) -> RiskResult<Self> {
        Self::colored(
            path,
            grid,
            builtin::green_red(),
            Scaling::relative(),
            true,
            init_value,
        )
    }

    /// Store one value at a grid cell. Out-of-range cells are a caller
    /// bug and fail; they are never clamped.
    pub fn write(&mut self, cell: (usize, usize), value: f64) -> RiskResult<()> {
        if matches!(self.state, State::Closed) {
            return Err(RiskError::RasterClosed(self.path.display().to_string()));
        }

        let (row, col) = cell;
        self.grid.check_cell(GridCell::new(row, col))?;
        let idx = row * self.grid.columns + col;

        self.scaling.observe(value);

        match &mut self.payload {
            Payload::Immediate(bands) => {
                let (min, max) = self.scaling.domain();
                bands.set(row, col, self.colormap.resolve(value, min, max));
            }
            Payload::Deferred { values, written } => {
                values[idx] = value;
                written[idx] = true;
            }
        }

        Ok(())
    }

    /// Resolve every pixel to its final color. For deferred payloads this
    /// runs the relative min/max and normalization passes.
    pub fn finalize_bands(&self) -> RasterBands {
        match &self.payload {
            Payload::Immediate(bands) => bands.clone(),
            Payload::Deferred { values, written } => {
                let (mut min, mut max) = self.scaling.domain();
                let mut divisor = 1.0;
                if self.normalize && max > 0.0 {
                    divisor = max;
                    min /= divisor;
                    max /= divisor;
                }

                let mut bands = RasterBands::new(self.grid.rows, self.grid.columns);
                for (idx, &raw) in values.iter().enumerate() {
                    if !written[idx] {
                        continue;
                    }
                    let value = raw / divisor;
                    let row = idx / self.grid.columns;
                    let col = idx % self.grid.columns;
                    bands.set(row, col, self.colormap.resolve(value, min, max));
                }
                bands
            }
        }
    }

    /// Finalize and write the file. Terminal: further writes fail, and a
    /// repeated close is a no-op so the file is never written twice.
    pub fn close(&mut self) -> RiskResult<()> {
        if matches!(self.state, State::Closed) {
            debug!(path = %self.path.display(), "raster already closed");
            return Ok(());
        }

        let bands = self.finalize_bands();
        let origin = self.grid.region.upper_left_corner();
        let tiff = encoder::encode_geotiff(
            &bands,
            (self.grid.cell_size, self.grid.cell_size),
            (origin.longitude, origin.latitude),
        )?;
        std::fs::write(&self.path, tiff)?;
        self.state = State::Closed;

        debug!(
            path = %self.path.display(),
            rows = self.grid.rows,
            columns = self.grid.columns,
            "raster written"
        );
        Ok(())
    }

    /// The geotransform metadata this raster encodes.
    pub fn geo_transform(&self) -> GeoTransform {
        let origin = self.grid.region.upper_left_corner();
        (
            origin.longitude,
            self.grid.cell_size,
            0.0,
            origin.latitude,
            0.0,
            -self.grid.cell_size,
        )
    }

    pub fn scaling_mode(&self) -> ScalingMode {
        self.scaling.mode()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse and validate hazard-map IML bounds from configuration text.
fn parse_iml_bounds(min: &str, max: &str) -> RiskResult<Scaling> {
    let min: f64 = min
        .trim()
        .parse()
        .map_err(|_| RiskError::InvalidBounds(format!("'{}' is not a number", min)))?;
    let max: f64 = max
        .trim()
        .parse()
        .map_err(|_| RiskError::InvalidBounds(format!("'{}' is not a number", max)))?;

    if min < 0.0 {
        return Err(RiskError::InvalidBounds(format!(
            "IML bounds must be non-negative, got ({}, {})",
            min, max
        )));
    }

    Scaling::fixed(min, max)
}
