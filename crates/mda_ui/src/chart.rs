//! Canvas line-chart renderer for [`ChartSpec`]s.
//!
//! Draws axes, tick labels, the series polylines and a small legend.
//! Dual-axis charts map secondary series against the secondary y range.

use iced::alignment::{Horizontal, Vertical};
use iced::mouse;
use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use mda_core::charts::{ChartSpec, Series, SeriesColor};

use crate::theme::palette;

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 56.0;
const MARGIN_TOP: f32 = 16.0;
const MARGIN_BOTTOM: f32 = 36.0;
const TICKS: usize = 5;
const DASH_SEGMENTS: [f32; 2] = [6.0, 4.0];

/// A canvas program rendering one chart spec.
pub struct LineChart {
    spec: ChartSpec,
}

impl LineChart {
    pub fn new(spec: ChartSpec) -> Self {
        Self { spec }
    }
}

/// Inclusive value range along one axis.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn padded(mut self) -> Self {
        if !(self.max > self.min) {
            // Degenerate or inverted range: widen around the midpoint.
            let mid = self.min;
            self.min = mid - 0.5;
            self.max = mid + 0.5;
        }
        self
    }

    fn from_axis(range: Option<(f64, f64)>, values: impl Iterator<Item = f64>) -> Self {
        if let Some((a, b)) = range {
            return Self {
                min: a.min(b),
                max: a.max(b),
            }
            .padded();
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            return Self { min: 0.0, max: 1.0 };
        }
        Self { min, max }.padded()
    }

    fn to_fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    fn tick(&self, k: usize) -> f64 {
        self.min + (self.max - self.min) * k as f64 / (TICKS - 1) as f64
    }
}

impl LineChart {
    fn x_range(&self) -> Range {
        Range::from_axis(
            self.spec.x_axis.range,
            self.spec.series.iter().flat_map(|s| s.x.iter().copied()),
        )
    }

    fn y_range(&self) -> Range {
        Range::from_axis(
            self.spec.y_axis.range,
            self.spec
                .series
                .iter()
                .filter(|s| !s.on_secondary_axis)
                .flat_map(|s| s.y.iter().copied()),
        )
    }

    fn secondary_y_range(&self) -> Option<Range> {
        let axis = self.spec.secondary_y_axis.as_ref()?;
        Some(Range::from_axis(
            axis.range,
            self.spec
                .series
                .iter()
                .filter(|s| s.on_secondary_axis)
                .flat_map(|s| s.y.iter().copied()),
        ))
    }

    fn series_color(&self, series: &Series, index: usize) -> Color {
        match series.style.color {
            SeriesColor::Red => palette::RED,
            SeriesColor::Green => palette::GREEN,
            SeriesColor::Blue => palette::BLUE,
            SeriesColor::Black => palette::BLACK,
            SeriesColor::Auto => palette::AUTO[index % palette::AUTO.len()],
        }
    }
}

impl<Message> canvas::Program<Message> for LineChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let size = frame.size();

        let plot = Rectangle {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: (size.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (size.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };

        let x_range = self.x_range();
        let y_range = self.y_range();
        let y2_range = self.secondary_y_range();

        let project = |range: &Range, x: f64, y: f64| -> Point {
            let fx = range_clamp(x_range.to_fraction(x));
            let fy = range_clamp(range.to_fraction(y));
            Point::new(
                plot.x + fx as f32 * plot.width,
                plot.y + (1.0 - fy as f32) * plot.height,
            )
        };

        self.draw_grid(&mut frame, &plot, &x_range, &y_range, y2_range.as_ref());

        // Series polylines.
        for (index, series) in self.spec.series.iter().enumerate() {
            let range = if series.on_secondary_axis {
                match &y2_range {
                    Some(r) => r,
                    None => &y_range,
                }
            } else {
                &y_range
            };
            if series.x.len() < 2 {
                continue;
            }
            let path = Path::new(|builder| {
                let mut started = false;
                for (&x, &y) in series.x.iter().zip(&series.y) {
                    let point = project(range, x, y);
                    if started {
                        builder.line_to(point);
                    } else {
                        builder.move_to(point);
                        started = true;
                    }
                }
            });

            let color = self.series_color(series, index);
            let mut stroke = Stroke::default()
                .with_width(series.style.width.max(0.5))
                .with_color(color);
            if series.style.dashed {
                stroke.line_dash = canvas::LineDash {
                    segments: &DASH_SEGMENTS,
                    offset: 0,
                };
            }
            frame.stroke(&path, stroke);
        }

        self.draw_legend(&mut frame, &plot);
        vec![frame.into_geometry()]
    }
}

impl LineChart {
    fn draw_grid(
        &self,
        frame: &mut canvas::Frame,
        plot: &Rectangle,
        x_range: &Range,
        y_range: &Range,
        y2_range: Option<&Range>,
    ) {
        let axis_stroke = Stroke::default().with_width(1.0).with_color(palette::AXIS);
        let grid_stroke = Stroke::default().with_width(0.5).with_color(palette::GRID);

        // Frame around the plot area.
        let border = Path::rectangle(
            Point::new(plot.x, plot.y),
            Size::new(plot.width, plot.height),
        );
        frame.stroke(&border, axis_stroke);

        for k in 0..TICKS {
            let f = k as f32 / (TICKS - 1) as f32;

            // Vertical grid line + x tick label.
            let x = plot.x + f * plot.width;
            if k > 0 && k + 1 < TICKS {
                frame.stroke(
                    &Path::line(Point::new(x, plot.y), Point::new(x, plot.y + plot.height)),
                    grid_stroke,
                );
            }
            frame.fill_text(canvas::Text {
                content: format_tick(x_range.tick(k)),
                position: Point::new(x, plot.y + plot.height + 6.0),
                color: palette::LABEL,
                size: 11.0.into(),
                horizontal_alignment: Horizontal::Center,
                vertical_alignment: Vertical::Top,
                ..canvas::Text::default()
            });

            // Horizontal grid line + y tick labels.
            let y = plot.y + (1.0 - f) * plot.height;
            if k > 0 && k + 1 < TICKS {
                frame.stroke(
                    &Path::line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y)),
                    grid_stroke,
                );
            }
            frame.fill_text(canvas::Text {
                content: format_tick(y_range.tick(k)),
                position: Point::new(plot.x - 6.0, y),
                color: palette::LABEL,
                size: 11.0.into(),
                horizontal_alignment: Horizontal::Right,
                vertical_alignment: Vertical::Center,
                ..canvas::Text::default()
            });
            if let Some(y2) = y2_range {
                frame.fill_text(canvas::Text {
                    content: format_tick(y2.tick(k)),
                    position: Point::new(plot.x + plot.width + 6.0, y),
                    color: palette::LABEL,
                    size: 11.0.into(),
                    horizontal_alignment: Horizontal::Left,
                    vertical_alignment: Vertical::Center,
                    ..canvas::Text::default()
                });
            }
        }

        // Axis titles.
        frame.fill_text(canvas::Text {
            content: self.spec.x_axis.label.clone(),
            position: Point::new(plot.x + plot.width / 2.0, plot.y + plot.height + 20.0),
            color: palette::LABEL,
            size: 12.0.into(),
            horizontal_alignment: Horizontal::Center,
            vertical_alignment: Vertical::Top,
            ..canvas::Text::default()
        });
        frame.fill_text(canvas::Text {
            content: self.spec.y_axis.label.clone(),
            position: Point::new(plot.x, plot.y - 12.0),
            color: palette::LABEL,
            size: 12.0.into(),
            horizontal_alignment: Horizontal::Left,
            vertical_alignment: Vertical::Top,
            ..canvas::Text::default()
        });
    }

    fn draw_legend(&self, frame: &mut canvas::Frame, plot: &Rectangle) {
        let mut y = plot.y + 8.0;
        for (index, series) in self.spec.series.iter().enumerate() {
            let color = self.series_color(series, index);
            let x0 = plot.x + plot.width - 96.0;
            frame.stroke(
                &Path::line(Point::new(x0, y), Point::new(x0 + 18.0, y)),
                Stroke::default().with_width(2.0).with_color(color),
            );
            frame.fill_text(canvas::Text {
                content: series.name.clone(),
                position: Point::new(x0 + 24.0, y),
                color: palette::LABEL,
                size: 11.0.into(),
                horizontal_alignment: Horizontal::Left,
                vertical_alignment: Vertical::Center,
                ..canvas::Text::default()
            });
            y += 14.0;
        }
    }
}

fn range_clamp(f: f64) -> f64 {
    f.clamp(0.0, 1.0)
}

/// Compact tick formatting: fixed point for ordinary magnitudes,
/// scientific for the rest.
fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 10000.0 || (magnitude > 0.0 && magnitude < 0.01) {
        format!("{value:.1e}")
    } else if magnitude >= 100.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mda_core::charts::Axis;

    fn spec_with_series(series: Vec<Series>) -> ChartSpec {
        ChartSpec {
            title: "test".to_string(),
            x_axis: Axis::new("x"),
            y_axis: Axis::new("y"),
            secondary_y_axis: None,
            series,
        }
    }

    #[test]
    fn data_range_covers_all_primary_series() {
        let chart = LineChart::new(spec_with_series(vec![
            Series::new("a", vec![0.0, 1.0], vec![2.0, 3.0]).unwrap(),
            Series::new("b", vec![-1.0, 4.0], vec![0.5, 9.0]).unwrap(),
        ]));
        let xr = chart.x_range();
        assert_eq!(xr.min, -1.0);
        assert_eq!(xr.max, 4.0);
        let yr = chart.y_range();
        assert_eq!(yr.min, 0.5);
        assert_eq!(yr.max, 9.0);
    }

    #[test]
    fn fixed_axis_range_wins_over_data() {
        let mut spec = spec_with_series(vec![
            Series::new("a", vec![0.0, 10.0], vec![0.0, 10.0]).unwrap()
        ]);
        spec.x_axis = Axis::new("x").with_range(2.0, 4.0);
        let chart = LineChart::new(spec);
        let xr = chart.x_range();
        assert_eq!((xr.min, xr.max), (2.0, 4.0));
    }

    #[test]
    fn degenerate_range_is_widened() {
        let chart = LineChart::new(spec_with_series(vec![
            Series::new("flat", vec![0.0, 1.0], vec![5.0, 5.0]).unwrap()
        ]));
        let yr = chart.y_range();
        assert!(yr.max > yr.min);
    }

    #[test]
    fn tick_formatting_is_compact() {
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(123.4), "123");
        assert_eq!(format_tick(0.001), "1.0e-3");
        assert_eq!(format_tick(0.0), "0");
    }
}
