//! Self-diffusivity fit over an MSD sub-range.
//!
//! The user picks a lag-time window; the window is clamped to the
//! available range, converted to frame indices by integer division by the
//! assumed timestep, and an ordinary least-squares line is fitted to the
//! MSD sub-series. The slope becomes a diffusivity via the Einstein
//! relation D = slope / (2 * dim) with dim = 3 for 3D motion.

use thiserror::Error;

use super::types::MsdResult;

/// Dimensionality factor for a full 3D MSD.
pub const DIM_FACTOR: f64 = 3.0;

/// Error from the diffusivity fit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// The selected window holds fewer than two frames; the regression
    /// slope is undefined.
    #[error("fit window too narrow: {frames} frame(s) selected, need at least 2")]
    WindowTooNarrow { frames: usize },
}

/// A lag-time window in fs for the diffusivity fit.
///
/// Transient UI state; never cached with the MSD snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitWindow {
    pub start_fs: f64,
    pub end_fs: f64,
}

impl FitWindow {
    /// The full available lag-time range for a series length.
    pub fn full(msd: &MsdResult, timestep_fs: f64) -> Self {
        let last = msd.n_frames().saturating_sub(1) as f64 * timestep_fs;
        Self {
            start_fs: 0.0,
            end_fs: last,
        }
    }

    /// Clamp both ends into [0, max_fs] and restore ordering.
    pub fn clamped(self, max_fs: f64) -> Self {
        let start = self.start_fs.clamp(0.0, max_fs);
        let end = self.end_fs.clamp(0.0, max_fs);
        if start <= end {
            Self {
                start_fs: start,
                end_fs: end,
            }
        } else {
            Self {
                start_fs: end,
                end_fs: start,
            }
        }
    }
}

/// Result of the self-diffusivity fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusivityFit {
    /// OLS slope of MSD vs lag time, in A^2/fs.
    pub slope: f64,
    /// OLS intercept in A^2.
    pub intercept: f64,
    /// Pearson correlation coefficient of the fit.
    pub r_value: f64,
    /// Self-diffusivity D = slope / (2 * DIM_FACTOR), in A^2/fs.
    pub diffusivity: f64,
}

impl DiffusivityFit {
    /// Diffusivity scaled for display, i.e. multiplied by 1e-5 for the
    /// A^2/fs to m^2/s presentation used by the dashboard.
    pub fn display_m2_per_s(&self) -> f64 {
        self.diffusivity * 1e-5
    }
}

/// Fit a line to the MSD inside the window and derive the diffusivity.
pub fn fit_self_diffusivity(
    msd: &MsdResult,
    timestep_fs: f64,
    window: FitWindow,
) -> Result<DiffusivityFit, FitError> {
    let lagtimes = msd.lagtimes(timestep_fs);
    let max_fs = lagtimes.last().copied().unwrap_or(0.0);
    let window = window.clamped(max_fs);

    // Frame indices by integer division, end exclusive.
    let start = (window.start_fs / timestep_fs) as usize;
    let end = ((window.end_fs / timestep_fs) as usize).min(msd.n_frames());

    let frames = end.saturating_sub(start);
    if frames < 2 {
        return Err(FitError::WindowTooNarrow { frames });
    }

    let (slope, intercept, r_value) =
        linear_regression(&lagtimes[start..end], &msd.timeseries[start..end])
            .ok_or(FitError::WindowTooNarrow { frames })?;

    Ok(DiffusivityFit {
        slope,
        intercept,
        r_value,
        diffusivity: slope / (2.0 * DIM_FACTOR),
    })
}

/// Ordinary least-squares regression of y on x.
///
/// Returns `(slope, intercept, r)`, or `None` when x is degenerate
/// (fewer than two points or zero variance).
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<(f64, f64, f64)> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / n_f;
    let mean_y = y[..n].iter().sum::<f64>() / n_f;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }
    if ss_xx == 0.0 {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let r = if ss_yy == 0.0 {
        // A perfectly flat series is perfectly fitted by a flat line.
        1.0
    } else {
        ss_xy / (ss_xx * ss_yy).sqrt()
    };
    Some((slope, intercept, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_msd(slope: f64, n: usize, timestep_fs: f64) -> MsdResult {
        MsdResult {
            timeseries: (0..n).map(|i| slope * i as f64 * timestep_fs).collect(),
        }
    }

    #[test]
    fn known_slope_yields_slope_over_six() {
        let msd = linear_msd(0.42, 50, 100.0);
        let window = FitWindow::full(&msd, 100.0);
        let fit = fit_self_diffusivity(&msd, 100.0, window).unwrap();

        assert!((fit.slope - 0.42).abs() < 1e-12);
        assert!((fit.diffusivity - 0.42 / 6.0).abs() < 1e-12);
        assert!((fit.r_value - 1.0).abs() < 1e-12);
        assert!((fit.display_m2_per_s() - 0.42 / 6.0 * 1e-5).abs() < 1e-18);
    }

    #[test]
    fn window_of_one_frame_is_too_narrow() {
        let msd = linear_msd(1.0, 50, 100.0);
        let window = FitWindow {
            start_fs: 300.0,
            end_fs: 499.0,
        };
        let err = fit_self_diffusivity(&msd, 100.0, window).unwrap_err();
        assert_eq!(err, FitError::WindowTooNarrow { frames: 1 });
    }

    #[test]
    fn window_of_zero_frames_is_too_narrow() {
        let msd = linear_msd(1.0, 50, 100.0);
        let window = FitWindow {
            start_fs: 400.0,
            end_fs: 400.0,
        };
        let err = fit_self_diffusivity(&msd, 100.0, window).unwrap_err();
        assert!(matches!(err, FitError::WindowTooNarrow { .. }));
    }

    #[test]
    fn window_clamps_to_available_range() {
        let msd = linear_msd(0.2, 10, 100.0);
        let window = FitWindow {
            start_fs: -500.0,
            end_fs: 1e9,
        };
        let fit = fit_self_diffusivity(&msd, 100.0, window).unwrap();
        assert!((fit.slope - 0.2).abs() < 1e-12);
    }

    #[test]
    fn reversed_window_is_reordered() {
        let window = FitWindow {
            start_fs: 800.0,
            end_fs: 200.0,
        }
        .clamped(900.0);
        assert!((window.start_fs - 200.0).abs() < 1e-12);
        assert!((window.end_fs - 800.0).abs() < 1e-12);
    }

    #[test]
    fn regression_matches_hand_computation() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let (slope, intercept, r) = linear_regression(&x, &y).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_rejects_single_point() {
        assert!(linear_regression(&[1.0], &[2.0]).is_none());
    }
}
