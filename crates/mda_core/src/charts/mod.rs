//! Chart specifications for the presentation layer.
//!
//! The core describes charts as data (series, axes, line styles); the UI
//! decides how to draw them. Builders only accept complete results, so a
//! failed computation can never produce a partial chart.

use thiserror::Error;

use crate::analysis::diffusivity::FitWindow;
use crate::analysis::{LinearDensityResult, MsdResult, RdfResult};
use crate::io::reference::ReferenceCurve;

/// Error from chart construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// A series' x and y vectors disagree in length.
    #[error("series '{name}' has {x_len} x values but {y_len} y values")]
    SeriesLengthMismatch {
        name: String,
        x_len: usize,
        y_len: usize,
    },
}

/// Result type for chart construction.
pub type ChartResult<T> = Result<T, ChartError>;

/// Named color slots the UI maps onto its palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesColor {
    /// Pick from the default palette by series order.
    #[default]
    Auto,
    Red,
    Green,
    Blue,
    Black,
}

/// Line rendering style for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: SeriesColor,
    pub dashed: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.5,
            color: SeriesColor::Auto,
            dashed: false,
        }
    }
}

impl LineStyle {
    pub fn thin(color: SeriesColor) -> Self {
        Self {
            width: 0.5,
            color,
            dashed: false,
        }
    }

    pub fn bold(color: SeriesColor) -> Self {
        Self {
            width: 3.0,
            color,
            dashed: false,
        }
    }

    pub fn dashed() -> Self {
        Self {
            dashed: true,
            ..Self::default()
        }
    }
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: LineStyle,
    /// Drawn against the secondary y axis when present.
    pub on_secondary_axis: bool,
}

impl Series {
    /// Build a series; the x and y lengths must agree.
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> ChartResult<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(ChartError::SeriesLengthMismatch {
                name,
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self {
            name,
            x,
            y,
            style: LineStyle::default(),
            on_secondary_axis: false,
        })
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn on_secondary_axis(mut self) -> Self {
        self.on_secondary_axis = true;
        self
    }
}

/// Axis description with an optional fixed display range.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    pub range: Option<(f64, f64)>,
}

impl Axis {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Present only for dual-axis charts (the MSD slope reference).
    pub secondary_y_axis: Option<Axis>,
    pub series: Vec<Series>,
}

/// RDF chart: calculated curve plus the optional experimental overlay.
pub fn rdf_chart(result: &RdfResult, reference: Option<&ReferenceCurve>) -> ChartResult<ChartSpec> {
    let mut series = Vec::new();
    if let Some(exp) = reference {
        series.push(Series::new(
            "Experimental",
            exp.r.clone(),
            exp.g.clone(),
        )?);
    }
    series.push(Series::new(
        "Calculated",
        result.bins.clone(),
        result.gr.clone(),
    )?);

    Ok(ChartSpec {
        title: "Radial Distribution Function".to_string(),
        x_axis: Axis::new("r (Å)"),
        y_axis: Axis::new("g(r) O-O"),
        secondary_y_axis: None,
        series,
    })
}

/// Linear density chart: X, Y, Z and their average.
///
/// Histogram edges have one more value than the densities; series use the
/// left bin edges so every series shares the same length.
pub fn linear_density_chart(result: &LinearDensityResult) -> ChartResult<ChartSpec> {
    let nbins = result.x.density.len();
    let left = |edges: &[f64]| edges[..nbins].to_vec();

    let series = vec![
        Series::new("X", left(&result.x.edges), result.x.density.clone())?
            .with_style(LineStyle::thin(SeriesColor::Red)),
        Series::new("Y", left(&result.y.edges), result.y.density.clone())?
            .with_style(LineStyle::thin(SeriesColor::Green)),
        Series::new("Z", left(&result.z.edges), result.z.density.clone())?
            .with_style(LineStyle::thin(SeriesColor::Blue)),
        Series::new("Average", left(&result.z.edges), result.average())?
            .with_style(LineStyle::bold(SeriesColor::Black)),
    ];

    Ok(ChartSpec {
        title: "Linear Density".to_string(),
        x_axis: Axis::new("position (Å)"),
        y_axis: Axis::new("mass density (g/cm³)"),
        secondary_y_axis: None,
        series,
    })
}

/// MSD chart with the unit-slope reference on a secondary axis.
///
/// Axis ranges zoom onto the fit window like the original dashboard; the
/// reference line spans the window and takes no part in the regression.
pub fn msd_chart(
    msd: &MsdResult,
    timestep_fs: f64,
    window: &FitWindow,
) -> ChartResult<ChartSpec> {
    let lagtimes = msd.lagtimes(timestep_fs);
    let max_fs = lagtimes.last().copied().unwrap_or(0.0);
    let window = window.clamped(max_fs);

    let msd_series = Series::new("MSD", lagtimes, msd.timeseries.clone())?;
    let reference = Series::new(
        "slope = 1",
        vec![window.start_fs, window.end_fs],
        vec![window.start_fs, window.end_fs],
    )?
    .with_style(LineStyle::dashed())
    .on_secondary_axis();

    let start_idx = ((window.start_fs / timestep_fs) as usize).min(msd.n_frames().saturating_sub(1));
    let end_idx = ((window.end_fs / timestep_fs) as usize).min(msd.n_frames().saturating_sub(1));

    Ok(ChartSpec {
        title: "Mean Squared Displacement".to_string(),
        x_axis: Axis::new("lagtime (fs)").with_range(window.start_fs, window.end_fs),
        y_axis: Axis::new("MSD (Å²)")
            .with_range(msd.timeseries[start_idx], msd.timeseries[end_idx]),
        secondary_y_axis: Some(Axis::new("").with_range(window.start_fs, window.end_fs)),
        series: vec![msd_series, reference],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AxisDensity;

    fn density_result(nbins: usize) -> LinearDensityResult {
        let axis = |scale: f64| AxisDensity {
            edges: (0..=nbins).map(|k| k as f64).collect(),
            density: (0..nbins).map(|k| scale * k as f64).collect(),
        };
        LinearDensityResult {
            x: axis(1.0),
            y: axis(2.0),
            z: axis(3.0),
        }
    }

    #[test]
    fn series_rejects_mismatched_lengths() {
        let err = Series::new("bad", vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, ChartError::SeriesLengthMismatch { .. }));
    }

    #[test]
    fn rdf_chart_overlays_reference_first() {
        let result = RdfResult {
            bins: vec![2.0, 3.0],
            gr: vec![0.0, 1.5],
        };
        let reference = ReferenceCurve {
            r: vec![2.0, 3.0],
            g: vec![0.1, 1.4],
        };
        let chart = rdf_chart(&result, Some(&reference)).unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "Experimental");
        assert_eq!(chart.series[1].name, "Calculated");

        let without = rdf_chart(&result, None).unwrap();
        assert_eq!(without.series.len(), 1);
    }

    #[test]
    fn density_chart_has_four_equal_length_series() {
        let chart = linear_density_chart(&density_result(5)).unwrap();
        assert_eq!(chart.series.len(), 4);
        for series in &chart.series {
            assert_eq!(series.x.len(), 5);
            assert_eq!(series.y.len(), 5);
        }
        assert_eq!(chart.series[3].name, "Average");
        assert_eq!(chart.series[3].style.width, 3.0);
    }

    #[test]
    fn msd_chart_puts_reference_on_secondary_axis() {
        let msd = MsdResult {
            timeseries: (0..10).map(|i| i as f64).collect(),
        };
        let window = FitWindow {
            start_fs: 200.0,
            end_fs: 700.0,
        };
        let chart = msd_chart(&msd, 100.0, &window).unwrap();

        assert!(chart.secondary_y_axis.is_some());
        assert_eq!(chart.series.len(), 2);
        let reference = &chart.series[1];
        assert!(reference.on_secondary_axis);
        assert!(reference.style.dashed);
        assert_eq!(reference.x, vec![200.0, 700.0]);
        assert_eq!(chart.x_axis.range, Some((200.0, 700.0)));
    }
}
