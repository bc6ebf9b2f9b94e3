//! Geographic region, grid and site types.
//!
//! A `Region` is the polygon envelope of the area under analysis; it derives
//! a `Grid` of equal-angle cells anchored at the region's upper-left corner.
//! Grid rows increase southward, columns increase eastward.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Default grid spacing in degrees.
pub const DEFAULT_CELL_SIZE: f64 = 0.1;

/// A geographic point as (longitude, latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub longitude: f64,
    pub latitude: f64,
}

impl Site {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A polygon region, reduced to its axis-aligned envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
}

impl Region {
    /// Build a region from an ordered sequence of (longitude, latitude)
    /// polygon vertices.
    pub fn from_coordinates(vertices: &[(f64, f64)]) -> RiskResult<Self> {
        if vertices.is_empty() {
            return Err(RiskError::Region("region has no vertices".to_string()));
        }

        let mut region = Region {
            min_longitude: f64::INFINITY,
            min_latitude: f64::INFINITY,
            max_longitude: f64::NEG_INFINITY,
            max_latitude: f64::NEG_INFINITY,
        };

        for &(lon, lat) in vertices {
            if !lon.is_finite() || !lat.is_finite() {
                return Err(RiskError::Region(format!(
                    "non-finite vertex ({}, {})",
                    lon, lat
                )));
            }
            region.min_longitude = region.min_longitude.min(lon);
            region.max_longitude = region.max_longitude.max(lon);
            region.min_latitude = region.min_latitude.min(lat);
            region.max_latitude = region.max_latitude.max(lat);
        }

        Ok(region)
    }

    /// The upper-left corner of the envelope, which anchors derived grids.
    pub fn upper_left_corner(&self) -> Site {
        Site::new(self.min_longitude, self.max_latitude)
    }

    /// Derive the grid of cells covering this region.
    pub fn grid(&self, cell_size: f64) -> RiskResult<Grid> {
        Grid::new(*self, cell_size)
    }
}

/// A grid cell address as (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Rectangular discretization of a region into equal-angle cells.
///
/// Cell (row, col) maps to `origin + (col * cell_size, -row * cell_size)`
/// and the mapping is reversible through `point_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub region: Region,
    pub cell_size: f64,
    pub rows: usize,
    pub columns: usize,
}

impl Grid {
    /// Create a grid over a region. Both envelope edges are covered by a
    /// grid node, so an N-degree span at cell size s yields N/s + 1 nodes.
    pub fn new(region: Region, cell_size: f64) -> RiskResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RiskError::Region(format!(
                "invalid cell size {}",
                cell_size
            )));
        }

        let lon_span = region.max_longitude - region.min_longitude;
        let lat_span = region.max_latitude - region.min_latitude;

        let columns = (lon_span / cell_size).round() as usize + 1;
        let rows = (lat_span / cell_size).round() as usize + 1;

        Ok(Self {
            region,
            cell_size,
            rows,
            columns,
        })
    }

    /// The geographic coordinate of a cell's node.
    pub fn site_at(&self, cell: GridCell) -> RiskResult<Site> {
        self.check_cell(cell)?;
        let origin = self.region.upper_left_corner();
        Ok(Site::new(
            origin.longitude + cell.column as f64 * self.cell_size,
            origin.latitude - cell.row as f64 * self.cell_size,
        ))
    }

    /// The cell whose node is nearest to a site.
    pub fn point_at(&self, site: Site) -> RiskResult<GridCell> {
        let origin = self.region.upper_left_corner();
        let col = ((site.longitude - origin.longitude) / self.cell_size).round();
        let row = ((origin.latitude - site.latitude) / self.cell_size).round();

        if col < 0.0 || row < 0.0 {
            return Err(RiskError::OutOfBounds {
                row: row.max(0.0) as usize,
                col: col.max(0.0) as usize,
                rows: self.rows,
                columns: self.columns,
            });
        }

        let cell = GridCell::new(row as usize, col as usize);
        self.check_cell(cell)?;
        Ok(cell)
    }

    /// Validate that a cell address lies inside the grid.
    pub fn check_cell(&self, cell: GridCell) -> RiskResult<()> {
        if cell.row >= self.rows || cell.column >= self.columns {
            return Err(RiskError::OutOfBounds {
                row: cell.row,
                col: cell.column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// Iterate all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| GridCell::new(row, col)))
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }
}
