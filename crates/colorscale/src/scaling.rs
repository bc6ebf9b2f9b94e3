//! Value-to-domain scaling policies for raster writers.

use serde::{Deserialize, Serialize};

use risk_common::{RiskError, RiskResult};

/// Whether the color domain is caller-specified or derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    Fixed,
    Relative,
}

/// Maps written values onto the colormap domain.
///
/// `Fixed` carries explicit bounds validated at construction; `Relative`
/// accumulates the observed min/max of every written value and is only
/// resolvable at finalization time.
#[derive(Debug, Clone, PartialEq)]
pub enum Scaling {
    Fixed { min: f64, max: f64 },
    Relative { observed: Option<(f64, f64)> },
}

impl Scaling {
    /// Fixed bounds. Fails fast on non-finite or non-ascending pairs,
    /// before any write happens.
    pub fn fixed(min: f64, max: f64) -> RiskResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(RiskError::InvalidBounds(format!(
                "bounds must be finite, got ({}, {})",
                min, max
            )));
        }
        if min >= max {
            return Err(RiskError::InvalidBounds(format!(
                "min must be below max, got ({}, {})",
                min, max
            )));
        }
        Ok(Scaling::Fixed { min, max })
    }

    /// Bounds derived from the observed data.
    pub fn relative() -> Self {
        Scaling::Relative { observed: None }
    }

    pub fn mode(&self) -> ScalingMode {
        match self {
            Scaling::Fixed { .. } => ScalingMode::Fixed,
            Scaling::Relative { .. } => ScalingMode::Relative,
        }
    }

    /// Feed one written value into a relative scaling. Undefined values are
    /// ignored; fixed scalings are unaffected.
    pub fn observe(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        if let Scaling::Relative { observed } = self {
            *observed = Some(match *observed {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
    }

    /// The resolved value domain. A relative scaling that saw no values
    /// defaults to (0, 0).
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Scaling::Fixed { min, max } => (*min, *max),
            Scaling::Relative { observed } => observed.unwrap_or((0.0, 0.0)),
        }
    }
}
