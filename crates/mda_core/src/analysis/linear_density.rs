//! Linear mass density along the three Cartesian axes.
//!
//! Histograms atom masses into fixed-width slabs along x, y and z, then
//! converts the frame-averaged slab masses to g/cm^3.

use super::types::{AnalysisError, AnalysisResult, AxisDensity, LinearDensityResult};
use crate::models::System;

/// amu per cubic Angstrom expressed in g/cm^3.
const AMU_PER_A3_TO_G_PER_CM3: f64 = 1.66053906892;

/// Configuration for the linear density kernel.
#[derive(Debug, Clone)]
pub struct LinearDensityConfig {
    /// Target histogram bin width in Angstrom.
    pub binsize: f64,
}

impl Default for LinearDensityConfig {
    fn default() -> Self {
        Self { binsize: 0.1 }
    }
}

/// Compute mass density histograms along each axis.
///
/// The bin count is `ceil(edge / binsize)` with the edges spanning
/// exactly [0, edge], so the effective width is within one part in the
/// bin count of the configured one. Coordinates are wrapped into the
/// primary cell before binning. All three axes share the same bin count
/// for a cubic cell.
pub fn run(system: &System, config: &LinearDensityConfig) -> AnalysisResult<LinearDensityResult> {
    if system.n_frames() == 0 {
        return Err(AnalysisError::EmptyTrajectory);
    }
    if system.n_atoms() == 0 {
        return Err(AnalysisError::empty_selection("all atoms"));
    }

    let edge = system.cell.edge;
    let nbins = (edge / config.binsize).ceil() as usize;
    let width = edge / nbins as f64;

    let mut hists = [vec![0.0f64; nbins], vec![0.0f64; nbins], vec![0.0f64; nbins]];
    for frame in &system.frames {
        for (atom, coord) in system.atoms.iter().zip(&frame.coords) {
            let wrapped = system.cell.wrap(*coord);
            for axis in 0..3 {
                let bin = ((wrapped[axis] / width) as usize).min(nbins - 1);
                hists[axis][bin] += atom.mass;
            }
        }
    }

    // Slab volume is the same along each axis of a cubic cell.
    let slab_volume = width * edge * edge;
    let n_frames = system.n_frames() as f64;
    let to_density = AMU_PER_A3_TO_G_PER_CM3 / (slab_volume * n_frames);

    let edges: Vec<f64> = (0..=nbins).map(|k| k as f64 * width).collect();
    let [hx, hy, hz] = hists;
    let axis_density = |hist: Vec<f64>| AxisDensity {
        edges: edges.clone(),
        density: hist.into_iter().map(|mass| mass * to_density).collect(),
    };

    Ok(LinearDensityResult {
        x: axis_density(hx),
        y: axis_density(hy),
        z: axis_density(hz),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{atomic_mass, AtomRecord, CubicBox, Frame};

    fn single_atom_system(coord: [f64; 3], edge: f64, n_frames: usize) -> System {
        System {
            atoms: vec![AtomRecord {
                name: "O".to_string(),
                element: "O".to_string(),
                mass: atomic_mass("O").unwrap(),
                charge: 0.0,
                resid: 1,
            }],
            bonds: vec![],
            frames: (0..n_frames)
                .map(|_| Frame {
                    coords: vec![coord],
                })
                .collect(),
            cell: CubicBox::from_edge(edge).unwrap(),
        }
    }

    #[test]
    fn axes_share_bin_layout() {
        let system = single_atom_system([4.05, 9.0, 17.95], 18.0, 1);
        let result = run(&system, &LinearDensityConfig::default()).unwrap();

        assert_eq!(result.x.edges.len(), 181);
        assert_eq!(result.x.edges.len(), result.y.edges.len());
        assert_eq!(result.y.edges.len(), result.z.edges.len());
        assert_eq!(result.x.density.len(), 180);
        assert!((result.x.edges[0]).abs() < 1e-12);
        assert!((result.x.edges[180] - 18.0).abs() < 1e-12);
    }

    #[test]
    fn mass_lands_in_matching_bins() {
        let system = single_atom_system([4.05, 9.0, 17.95], 18.0, 1);
        let result = run(&system, &LinearDensityConfig::default()).unwrap();

        let populated = |axis: &AxisDensity| -> Vec<usize> {
            axis.density
                .iter()
                .enumerate()
                .filter(|(_, &d)| d > 0.0)
                .map(|(k, _)| k)
                .collect()
        };
        assert_eq!(populated(&result.x), vec![40]);
        assert_eq!(populated(&result.y), vec![90]);
        assert_eq!(populated(&result.z), vec![179]);
    }

    #[test]
    fn density_converts_to_g_per_cm3() {
        let system = single_atom_system([0.05, 0.05, 0.05], 18.0, 2);
        let result = run(&system, &LinearDensityConfig::default()).unwrap();

        // One oxygen in one slab per frame: mass / (slab volume * frames),
        // frames cancel for a static atom.
        let slab_volume = 0.1 * 18.0 * 18.0;
        let expected = 15.999 / slab_volume * AMU_PER_A3_TO_G_PER_CM3;
        let got: f64 = result.x.density.iter().sum();
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn average_series_matches_manual_mean() {
        let system = single_atom_system([4.05, 9.0, 17.95], 18.0, 3);
        let result = run(&system, &LinearDensityConfig::default()).unwrap();
        let average = result.average();
        assert_eq!(average.len(), result.x.density.len());
        for (k, &avg) in average.iter().enumerate() {
            let manual =
                (result.x.density[k] + result.y.density[k] + result.z.density[k]) / 3.0;
            assert!((avg - manual).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_trajectory_is_an_error() {
        let mut system = single_atom_system([0.0, 0.0, 0.0], 18.0, 1);
        system.frames.clear();
        assert!(matches!(
            run(&system, &LinearDensityConfig::default()),
            Err(AnalysisError::EmptyTrajectory)
        ));
    }
}
