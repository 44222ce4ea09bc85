//! Analysis kernels for the four derived quantities.
//!
//! Each kernel is a pure function over a freshly built [`System`] plus a
//! config struct; the session layer decides when to run one and where the
//! snapshot lives. The pipeline per user request:
//!
//! 1. **Transforms** (`transforms`): make molecules whole across the
//!    periodic boundary, re-wrap solvent residues by center of mass.
//! 2. **RDF** (`rdf`): O-O pair distribution over a fixed range.
//! 3. **Linear density** (`linear_density`): per-axis mass histograms.
//! 4. **MSD** (`msd`): FFT-accelerated Einstein mean-squared displacement.
//! 5. **Diffusivity** (`diffusivity`): windowed OLS fit over the MSD.
//! 6. **Dielectric** (`dielectric`): dipole-fluctuation constant.
//!
//! # Usage
//!
//! ```ignore
//! use mda_core::analysis::{msd, diffusivity::{self, FitWindow}};
//! use mda_core::system::build_system;
//!
//! let system = build_system(&selection)?;
//! let result = msd::run(&system)?;
//! let window = FitWindow::full(&result, timestep_fs);
//! let fit = diffusivity::fit_self_diffusivity(&result, timestep_fs, window)?;
//! ```
//!
//! [`System`]: crate::models::System

pub mod dielectric;
pub mod diffusivity;
pub mod linear_density;
pub mod msd;
pub mod rdf;
pub mod transforms;
mod types;

pub use types::{
    AnalysisError, AnalysisResult, AxisDensity, DielectricResult, LinearDensityResult,
    MetricResult, MsdResult, RdfResult,
};
