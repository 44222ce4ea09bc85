//! Einstein mean-squared displacement, FFT-accelerated.
//!
//! Computes the 3D MSD over all atoms with the standard decomposition
//! MSD(m) = S1(m) - 2*S2(m), where S1 comes from running sums of squared
//! norms and S2 is the sum of per-dimension position autocorrelations,
//! each computed via zero-padded FFTs. One value per lag frame, averaged
//! over atoms.

use rustfft::{num_complex::Complex, FftPlanner};

use super::types::{AnalysisError, AnalysisResult, MsdResult};
use crate::models::System;

/// Run the Einstein MSD over all atoms of the system.
pub fn run(system: &System) -> AnalysisResult<MsdResult> {
    let n_frames = system.n_frames();
    if n_frames == 0 {
        return Err(AnalysisError::EmptyTrajectory);
    }
    let n_atoms = system.n_atoms();
    if n_atoms == 0 {
        return Err(AnalysisError::empty_selection("all atoms"));
    }

    let mut planner = FftPlanner::<f64>::new();
    let mut total = vec![0.0f64; n_frames];
    let mut series = vec![0.0f64; n_frames];

    for atom in 0..n_atoms {
        // Squared norm per frame for this atom.
        let sq: Vec<f64> = system
            .frames
            .iter()
            .map(|frame| {
                let c = frame.coords[atom];
                c[0] * c[0] + c[1] * c[1] + c[2] * c[2]
            })
            .collect();

        // S2: sum of per-dimension autocorrelations.
        let mut s2 = vec![0.0f64; n_frames];
        for dim in 0..3 {
            let signal: Vec<f64> = system
                .frames
                .iter()
                .map(|frame| frame.coords[atom][dim])
                .collect();
            let auto = autocorrelation(&mut planner, &signal);
            for (acc, value) in s2.iter_mut().zip(auto) {
                *acc += value;
            }
        }

        // S1 via the running-sum recursion.
        let mut q = 2.0 * sq.iter().sum::<f64>();
        for m in 0..n_frames {
            if m > 0 {
                q -= sq[m - 1] + sq[n_frames - m];
            }
            let lags = (n_frames - m) as f64;
            series[m] = q / lags - 2.0 * s2[m] / lags;
        }

        for (acc, value) in total.iter_mut().zip(&series) {
            *acc += value;
        }
    }

    let inv_atoms = 1.0 / n_atoms as f64;
    let timeseries: Vec<f64> = total
        .into_iter()
        // Clamp tiny negative values from floating-point cancellation.
        .map(|v| (v * inv_atoms).max(0.0))
        .collect();

    Ok(MsdResult { timeseries })
}

/// Linear autocorrelation `sum_t x[t] * x[t+m]` for every lag `m`,
/// computed with a zero-padded FFT pair.
fn autocorrelation(planner: &mut FftPlanner<f64>, signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    // Pad to a power of two that can hold the linear (non-circular) result.
    let fft_len = (2 * n).next_power_of_two();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_len, Complex::new(0.0, 0.0));

    fft.process(&mut buffer);
    for value in &mut buffer {
        *value = *value * value.conj();
    }
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_len as f64;
    buffer[..n].iter().map(|c| c.re * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{atomic_mass, AtomRecord, CubicBox, Frame};

    fn system_from_positions(per_atom: Vec<Vec<[f64; 3]>>) -> System {
        let n_frames = per_atom[0].len();
        let atoms = (0..per_atom.len())
            .map(|i| AtomRecord {
                name: format!("O{i}"),
                element: "O".to_string(),
                mass: atomic_mass("O").unwrap(),
                charge: 0.0,
                resid: i as u32 + 1,
            })
            .collect();
        let frames = (0..n_frames)
            .map(|t| Frame {
                coords: per_atom.iter().map(|traj| traj[t]).collect(),
            })
            .collect();
        System {
            atoms,
            bonds: vec![],
            frames,
            cell: CubicBox::from_edge(100.0).unwrap(),
        }
    }

    #[test]
    fn linear_motion_gives_quadratic_msd() {
        // x(t) = t, so MSD(m) = m^2 exactly.
        let traj: Vec<[f64; 3]> = (0..8).map(|t| [t as f64, 0.0, 0.0]).collect();
        let system = system_from_positions(vec![traj]);
        let result = run(&system).unwrap();

        assert_eq!(result.n_frames(), 8);
        for (m, &value) in result.timeseries.iter().enumerate() {
            let expected = (m * m) as f64;
            assert!(
                (value - expected).abs() < 1e-8,
                "lag {m}: got {value}, expected {expected}"
            );
        }
    }

    #[test]
    fn msd_matches_direct_evaluation() {
        let traj_a: Vec<[f64; 3]> = (0..6)
            .map(|t| [0.3 * t as f64, (t as f64).sin(), 0.1 * (t * t) as f64])
            .collect();
        let traj_b: Vec<[f64; 3]> = (0..6)
            .map(|t| [1.0 - 0.2 * t as f64, 0.5 * t as f64, (t as f64).cos()])
            .collect();
        let system = system_from_positions(vec![traj_a.clone(), traj_b.clone()]);
        let result = run(&system).unwrap();

        let n = 6usize;
        for m in 0..n {
            let mut acc = 0.0;
            for traj in [&traj_a, &traj_b] {
                for t in 0..n - m {
                    let d: f64 = (0..3)
                        .map(|k| (traj[t + m][k] - traj[t][k]).powi(2))
                        .sum();
                    acc += d;
                }
            }
            let expected = acc / ((n - m) as f64 * 2.0);
            assert!(
                (result.timeseries[m] - expected).abs() < 1e-8,
                "lag {m}: got {}, expected {expected}",
                result.timeseries[m]
            );
        }
    }

    #[test]
    fn msd_is_nonnegative_with_one_value_per_frame() {
        let traj: Vec<[f64; 3]> = (0..16)
            .map(|t| {
                let t = t as f64;
                [t.sin() * 3.0, t.cos() * 3.0, 0.5 * t]
            })
            .collect();
        let system = system_from_positions(vec![traj]);
        let result = run(&system).unwrap();
        assert_eq!(result.n_frames(), system.n_frames());
        assert!(result.timeseries.iter().all(|&v| v >= 0.0));
        assert!(result.timeseries[0].abs() < 1e-10);
    }

    #[test]
    fn stationary_atom_has_zero_msd() {
        let traj = vec![[2.0, 3.0, 4.0]; 5];
        let system = system_from_positions(vec![traj]);
        let result = run(&system).unwrap();
        assert!(result.timeseries.iter().all(|&v| v.abs() < 1e-9));
    }
}
