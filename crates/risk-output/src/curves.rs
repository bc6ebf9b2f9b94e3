//! Curve output files: newline-delimited JSON records plus an SVG plot.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use risk_common::{Curve, RiskError, RiskResult, Site};

/// One output record: a site and its full loss-ratio curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    pub lon: f64,
    pub lat: f64,
    pub curve: Curve,
}

impl CurveRecord {
    pub fn new(site: Site, curve: Curve) -> Self {
        Self {
            lon: site.longitude,
            lat: site.latitude,
            curve,
        }
    }
}

/// Writes the (site, curve) pairs of one block as files.
pub struct CurveFileWriter;

impl CurveFileWriter {
    /// Write one JSON record per line. Re-runs overwrite the whole file.
    pub fn write_records(path: impl AsRef<Path>, pairs: &[(Site, Curve)]) -> RiskResult<()> {
        let mut out = String::new();
        for (site, curve) in pairs {
            let record = CurveRecord::new(*site, curve.clone());
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }

        fs::write(path.as_ref(), out)?;
        debug!(path = %path.as_ref().display(), records = pairs.len(), "curve file written");
        Ok(())
    }

    /// Render all curves of a block into one SVG plot, one polyline per
    /// site, axes spanning the joint data range.
    pub fn write_plot(path: impl AsRef<Path>, pairs: &[(Site, Curve)]) -> RiskResult<()> {
        const WIDTH: f64 = 640.0;
        const HEIGHT: f64 = 480.0;
        const MARGIN: f64 = 40.0;

        let points = pairs.iter().flat_map(|(_, curve)| curve.points.iter());
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\">\n\
             <rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n",
            w = WIDTH,
            h = HEIGHT
        );

        for (site, curve) in pairs {
            if curve.is_empty() {
                continue;
            }
            let coords: Vec<String> = curve
                .points
                .iter()
                .map(|&(x, y)| {
                    let px = MARGIN + (x - x_min) / x_span * (WIDTH - 2.0 * MARGIN);
                    let py = HEIGHT - MARGIN - (y - y_min) / y_span * (HEIGHT - 2.0 * MARGIN);
                    format!("{:.2},{:.2}", px, py)
                })
                .collect();

            write!(
                svg,
                "<polyline fill=\"none\" stroke=\"steelblue\" stroke-width=\"1\" \
                 points=\"{}\"><title>({}, {})</title></polyline>\n",
                coords.join(" "),
                site.longitude,
                site.latitude
            )
            .map_err(|e| RiskError::Encode(format!("plot formatting failed: {}", e)))?;
        }
        svg.push_str("</svg>\n");

        fs::write(path.as_ref(), svg)?;
        debug!(path = %path.as_ref().display(), curves = pairs.len(), "curve plot written");
        Ok(())
    }
}
