//! Static dielectric constant from dipole-moment fluctuations.
//!
//! Molecules are made whole across periodic boundaries, then each frame's
//! total dipole M = sum(q_i * r_i) is accumulated. The constant follows
//! the fluctuation formula eps = 1 + (<M^2> - <M>^2) / (3 eps0 V kB T)
//! after converting from e*Angstrom to SI.

use super::transforms::unwrap_molecules;
use super::types::{AnalysisError, AnalysisResult, DielectricResult};
use crate::models::System;

/// Elementary charge in C.
const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;
/// One Angstrom in m.
const ANGSTROM: f64 = 1e-10;
/// Vacuum permittivity in F/m.
const VACUUM_PERMITTIVITY: f64 = 8.8541878128e-12;
/// Boltzmann constant in J/K.
const BOLTZMANN: f64 = 1.380649e-23;

/// Configuration for the dielectric kernel.
#[derive(Debug, Clone)]
pub struct DielectricConfig {
    /// Simulation temperature in K.
    pub temperature_k: f64,
}

impl Default for DielectricConfig {
    fn default() -> Self {
        Self {
            temperature_k: 298.15,
        }
    }
}

/// Compute the static dielectric constant.
///
/// Takes the system by value: the make-whole transform mutates the
/// frames and the system is rebuilt per run anyway.
pub fn run(mut system: System, config: &DielectricConfig) -> AnalysisResult<DielectricResult> {
    if system.n_frames() == 0 {
        return Err(AnalysisError::EmptyTrajectory);
    }
    if system.n_atoms() == 0 {
        return Err(AnalysisError::empty_selection("all atoms"));
    }
    if system.atoms.iter().all(|a| a.charge == 0.0) {
        tracing::warn!("topology carries no partial charges; dielectric constant will be 1");
    }

    unwrap_molecules(&mut system);

    let charges: Vec<f64> = system.atoms.iter().map(|a| a.charge).collect();
    let n_frames = system.n_frames() as f64;

    // Frame-averaged dipole vector and squared magnitude, in e*Angstrom.
    let mut mean_m = [0.0f64; 3];
    let mut mean_m_sq = 0.0f64;
    for frame in &system.frames {
        let mut m = [0.0f64; 3];
        for (&q, coord) in charges.iter().zip(&frame.coords) {
            for d in 0..3 {
                m[d] += q * coord[d];
            }
        }
        for d in 0..3 {
            mean_m[d] += m[d];
        }
        mean_m_sq += m[0] * m[0] + m[1] * m[1] + m[2] * m[2];
    }
    for d in 0..3 {
        mean_m[d] /= n_frames;
    }
    mean_m_sq /= n_frames;

    let fluct =
        mean_m_sq - (mean_m[0] * mean_m[0] + mean_m[1] * mean_m[1] + mean_m[2] * mean_m[2]);

    // e*Angstrom squared to C^2 m^2, volume to m^3.
    let fluct_si = fluct * (ELEMENTARY_CHARGE * ANGSTROM).powi(2);
    let volume_si = system.cell.volume() * ANGSTROM.powi(3);

    let eps_mean = 1.0
        + fluct_si
            / (3.0 * VACUUM_PERMITTIVITY * volume_si * BOLTZMANN * config.temperature_k);

    Ok(DielectricResult { eps_mean })
}
