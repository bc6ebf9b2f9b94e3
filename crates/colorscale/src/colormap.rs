//! Colormap: ordered value breakpoints plus colors, with discrete or
//! continuous resolution of scalar values to RGB pixels.

use serde::{Deserialize, Serialize};

use risk_common::{RiskError, RiskResult};

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp_u8 =
            |a: u8, b: u8| -> u8 { ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8 };

        Rgb::new(
            lerp_u8(self.r, other.r),
            lerp_u8(self.g, other.g),
            lerp_u8(self.b, other.b),
        )
    }
}

/// Whether colors fill breakpoint buckets or sit at interpolation nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// One color per bucket: `len(z_values) == len(colors) + 1`.
    Discrete,
    /// One color per breakpoint node: `len(z_values) == len(colors)`.
    Continuous,
}

/// An ordered sequence of breakpoint values paired with colors, plus the
/// three fixed colors for below-range, above-range and undefined values.
///
/// The fields are public so maps can be built in place; call `validate()`
/// on any hand-constructed map before resolving values through it. The
/// parser and the raster writers do this on every map they accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colormap {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub kind: MapKind,
    /// Declared color model. Only "RGB" is interpreted numerically; other
    /// models are carried as metadata.
    pub model: String,
    pub z_values: Vec<f64>,
    pub colors: Vec<Rgb>,
    pub background: Rgb,
    pub foreground: Rgb,
    pub nan: Rgb,
}

impl Colormap {
    pub fn is_rgb(&self) -> bool {
        self.model.eq_ignore_ascii_case("rgb")
    }

    /// Check the breakpoint/color invariants.
    pub fn validate(&self) -> RiskResult<()> {
        if self.z_values.len() < 2 {
            return Err(RiskError::Parse(format!(
                "colormap '{}' needs at least 2 breakpoints",
                self.name
            )));
        }

        for pair in self.z_values.windows(2) {
            if pair[1] < pair[0] {
                return Err(RiskError::Parse(format!(
                    "colormap '{}' breakpoints decrease at {}",
                    self.name, pair[1]
                )));
            }
        }

        let expected = match self.kind {
            MapKind::Discrete => self.z_values.len() - 1,
            MapKind::Continuous => self.z_values.len(),
        };
        if self.colors.len() != expected {
            return Err(RiskError::Parse(format!(
                "colormap '{}' has {} colors, expected {}",
                self.name,
                self.colors.len(),
                expected
            )));
        }

        Ok(())
    }

    /// Resolve a scalar value to a color given the value domain.
    ///
    /// Undefined values get the NaN color; values outside the domain get the
    /// background (below) or foreground (above) color. In-domain values are
    /// linearly rescaled onto the breakpoint span, then either bucketed
    /// (discrete) or interpolated within the enclosing segment (continuous).
    ///
    /// Requires a map that passes `validate()`.
    pub fn resolve(&self, value: f64, domain_min: f64, domain_max: f64) -> Rgb {
        debug_assert!(self.z_values.len() >= 2, "colormap not validated");

        if value.is_nan() {
            return self.nan;
        }
        if value < domain_min {
            return self.background;
        }
        if value > domain_max {
            return self.foreground;
        }

        let z_first = self.z_values[0];
        let z_last = *self.z_values.last().unwrap_or(&z_first);
        let span = domain_max - domain_min;
        let scaled = if span > 0.0 {
            z_first + (value - domain_min) / span * (z_last - z_first)
        } else {
            z_first
        };

        let bucket = self.bucket_index(scaled);
        match self.kind {
            MapKind::Discrete => self.colors[bucket],
            MapKind::Continuous => {
                let lo = self.z_values[bucket];
                let hi = self.z_values[bucket + 1];
                let t = if hi > lo { (scaled - lo) / (hi - lo) } else { 0.0 };
                self.colors[bucket].lerp(&self.colors[bucket + 1], t)
            }
        }
    }

    /// Locate the bucket/segment containing a rescaled value. A value equal
    /// to a breakpoint belongs to the bucket starting there, except the last
    /// breakpoint, which belongs to the final bucket.
    fn bucket_index(&self, z: f64) -> usize {
        let buckets = self.z_values.len() - 1;
        let at_or_below = self.z_values.partition_point(|&b| b <= z);
        at_or_below.saturating_sub(1).min(buckets - 1)
    }

    /// Sample the map's color at a relative position `t` in `[0, 1]` across
    /// its own breakpoint span. Requires a map that passes `validate()`.
    pub fn sample(&self, t: f64) -> Rgb {
        let z_first = self.z_values[0];
        let z_last = *self.z_values.last().unwrap_or(&z_first);
        let z = z_first + t.clamp(0.0, 1.0) * (z_last - z_first);
        self.resolve(z, z_first, z_last)
    }

    /// Derive a colormap with caller-supplied breakpoints, resampling this
    /// map's colors onto them. Used for explicit IML bins on ground-motion
    /// rasters.
    pub fn with_breakpoints(&self, breakpoints: &[f64], discrete: bool) -> RiskResult<Colormap> {
        if breakpoints.len() < 2 {
            return Err(RiskError::InvalidBounds(
                "breakpoint list needs at least 2 values".to_string(),
            ));
        }
        for pair in breakpoints.windows(2) {
            if !(pair[0].is_finite() && pair[1].is_finite()) || pair[1] <= pair[0] {
                return Err(RiskError::InvalidBounds(format!(
                    "breakpoints must be finite and ascending, got {} then {}",
                    pair[0], pair[1]
                )));
            }
        }

        let (kind, color_count) = if discrete {
            (MapKind::Discrete, breakpoints.len() - 1)
        } else {
            (MapKind::Continuous, breakpoints.len())
        };

        let colors = (0..color_count)
            .map(|i| {
                let t = if discrete {
                    (i as f64 + 0.5) / color_count as f64
                } else {
                    i as f64 / (color_count - 1) as f64
                };
                self.sample(t)
            })
            .collect();

        let map = Colormap {
            id: self.id.clone(),
            name: self.name.clone(),
            kind,
            model: self.model.clone(),
            z_values: breakpoints.to_vec(),
            colors,
            background: self.background,
            foreground: self.foreground,
            nan: self.nan,
        };
        map.validate()?;
        Ok(map)
    }
}
