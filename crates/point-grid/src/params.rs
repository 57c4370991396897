use serde::{Deserialize, Serialize};

use crate::point::FIXED_POINT_SCALE;

/// Number of points per grid row and column.
pub const GRID_N: usize = 10;

/// Acceptance thresholds for the step-by-step sequence tracer.
///
/// Direction is held tightly and spacing loosely: perspective keeps the
/// direction of a projected row but lets the spacing drift geometrically.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceParams {
    /// Minimal cosine between the previous step and the next one (≈5°).
    pub min_step_cos: f64,
    /// Maximal absolute difference between successive step lengths, in input units.
    pub max_step_length_error: f64,
    /// Allowed range of `next_length / previous_length`.
    pub min_length_ratio: f64,
    pub max_length_ratio: f64,
    /// Maximal deviation of a new length ratio from the running mean ratio.
    pub max_ratio_deviation: f64,
    /// Number of observed ratios before the deviation test kicks in.
    pub min_ratio_samples: usize,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            min_step_cos: 0.996,
            max_step_length_error: 80.0,
            min_length_ratio: 0.7,
            max_length_ratio: 1.4,
            max_ratio_deviation: 0.15,
            min_ratio_samples: 3,
        }
    }
}

impl TraceParams {
    pub(crate) fn max_step_length_error_fixed(&self) -> f64 {
        self.max_step_length_error * f64::from(FIXED_POINT_SCALE)
    }
}

/// Tolerances for assigning a sequence candidate to a direction bin.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BinFitParams {
    /// Maximal difference between candidate spacing and bin spacing, in input units.
    pub max_length_error: f64,
    /// Maximal angular difference in degrees, measured modulo 180°.
    pub max_angle_error_deg: f64,
}

impl Default for BinFitParams {
    fn default() -> Self {
        Self {
            max_length_error: 120.0,
            max_angle_error_deg: 40.0,
        }
    }
}

impl BinFitParams {
    pub(crate) fn max_length_error_fixed(&self) -> f64 {
        self.max_length_error * f64::from(FIXED_POINT_SCALE)
    }
}

/// Parameters for [`GridFinder`](crate::GridFinder).
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GridFinderParams {
    pub trace: TraceParams,
    pub bin_fit: BinFitParams,
    /// Require every row/column crossing to be the same input point.
    ///
    /// Off by default: the baseline acceptance test only checks the first
    /// row and column against each other plus the sequence counts.
    pub strict_lattice: bool,
    /// Dump per-candidate diagnostics through `log::debug!`.
    ///
    /// Never changes the result.
    pub debug: bool,
}
