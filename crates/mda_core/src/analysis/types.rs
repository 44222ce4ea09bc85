//! Core types for the analysis kernels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Metric;

/// Error from an analysis kernel.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The system carries no frames to analyze.
    #[error("trajectory has no frames")]
    EmptyTrajectory,

    /// A required atom selection matched nothing.
    #[error("selection matched no atoms: {what}")]
    EmptySelection { what: String },
}

impl AnalysisError {
    pub fn empty_selection(what: impl Into<String>) -> Self {
        Self::EmptySelection { what: what.into() }
    }
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Radial distribution function result: bin centers and g(r).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdfResult {
    /// Bin centers in Angstrom, equally spaced and ascending.
    pub bins: Vec<f64>,
    /// g(r) per bin, non-negative.
    pub gr: Vec<f64>,
}

/// Mass density histogram along one Cartesian axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDensity {
    /// Histogram bin edges in Angstrom (`nbins + 1` values).
    pub edges: Vec<f64>,
    /// Mass density per bin in g/cm^3 (`nbins` values).
    pub density: Vec<f64>,
}

/// Linear density result: one histogram per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearDensityResult {
    pub x: AxisDensity,
    pub y: AxisDensity,
    pub z: AxisDensity,
}

impl LinearDensityResult {
    /// Unweighted elementwise average of the three axis densities,
    /// plotted as a fourth series.
    pub fn average(&self) -> Vec<f64> {
        self.x
            .density
            .iter()
            .zip(&self.y.density)
            .zip(&self.z.density)
            .map(|((x, y), z)| (x + y + z) / 3.0)
            .collect()
    }
}

/// Mean-squared displacement result: one value per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsdResult {
    /// MSD per lag frame in Angstrom^2.
    pub timeseries: Vec<f64>,
}

impl MsdResult {
    pub fn n_frames(&self) -> usize {
        self.timeseries.len()
    }

    /// Lag-time axis in fs for an assumed frame spacing.
    ///
    /// The timestep is a configured placeholder, not trajectory metadata.
    pub fn lagtimes(&self, timestep_fs: f64) -> Vec<f64> {
        (0..self.timeseries.len())
            .map(|i| i as f64 * timestep_fs)
            .collect()
    }
}

/// Dielectric constant result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DielectricResult {
    /// Static dielectric constant (dimensionless).
    pub eps_mean: f64,
}

/// An immutable analysis snapshot, one per metric, stored in the session
/// cache. Strongly typed per metric instead of an attribute bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricResult {
    Rdf(RdfResult),
    LinearDensity(LinearDensityResult),
    Msd(MsdResult),
    Dielectric(DielectricResult),
}

impl MetricResult {
    /// The metric this snapshot belongs to.
    pub fn metric(&self) -> Metric {
        match self {
            MetricResult::Rdf(_) => Metric::Rdf,
            MetricResult::LinearDensity(_) => Metric::LinearDensity,
            MetricResult::Msd(_) => Metric::Msd,
            MetricResult::Dielectric(_) => Metric::Dielectric,
        }
    }
}
