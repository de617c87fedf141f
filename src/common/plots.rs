//! Chart rendering for the analysis results
//!
//! This module draws the three chart styles the projects use with the
//! [`plotters`] crate, saved as fixed 1200x800 PNG files:
//! - Multi-series line charts (income trends by category)
//! - Scatter of observed group means with overlaid predicted curves (wage
//!   regression)
//! - Per-bin percentage estimates bracketed by confidence bounds
//!
//! Rendering uses the bitmap backend so charts work in headless environments
//! (Docker/CI) without system font dependencies.

use crate::analysis::resampling::ConfidenceInterval;
use plotters::coord::CoordTranslate;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Chart resolution in pixels
const CHART_SIZE: (u32, u32) = (1200, 800);

/// Font sizes for the title, axis labels, tick labels, and legend
///
/// The defaults match the sizes used across the project charts; pass a
/// custom value to shrink or enlarge every text element of a chart.
#[derive(Debug, Clone, Copy)]
pub struct FontSizes {
    pub title: u32,
    pub label: u32,
    pub tick_label: u32,
    pub legend: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 40,
            label: 35,
            tick_label: 25,
            legend: 25,
        }
    }
}

/// Rotating four-color palette used to distinguish chart series
///
/// Colors cycle in a fixed order (crimson, goldenrod, green, navy) so
/// consecutive series on the same chart stay distinguishable.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    index: usize,
}

const PALETTE: [RGBColor; 4] = [
    RGBColor(220, 20, 60),  // crimson
    RGBColor(218, 165, 32), // goldenrod
    RGBColor(0, 128, 0),    // green
    RGBColor(0, 0, 128),    // navy
];

impl ColorCycle {
    /// Starts a fresh cycle at the first palette color
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Returns the next palette color, wrapping around after the last
    pub fn next(&mut self) -> RGBColor {
        let color = PALETTE[self.index % PALETTE.len()];
        self.index += 1;
        color
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}

/// A named series of (x, y) points for a line chart
#[derive(Debug, Clone)]
pub struct LabeledSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

/// Creates a multi-series line chart with a legend and saves it as a PNG file
///
/// Each series is drawn in the next palette color; axis ranges cover the
/// union of all series points.
///
/// # Arguments
/// * `series` - Named point series; all points must be finite
/// * `title` - Chart title displayed at the top of the plot
/// * `x_label` - Label for the X-axis
/// * `y_label` - Label for the Y-axis
/// * `output_path` - Path where the PNG file should be saved
/// * `fonts` - Font sizes for all text elements
pub fn create_series_plot(
    series: &[LabeledSeries],
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
    fonts: &FontSizes,
) -> Result<()> {
    let all_points: Vec<(f64, f64)> = series.iter().flat_map(|s| s.points.clone()).collect();
    validate_points(&all_points)?;

    let (x_range, y_range) = axis_ranges(&all_points);
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", fonts.title))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .x_label_style(("sans-serif", fonts.label))
        .y_desc(y_label)
        .y_label_style(("sans-serif", fonts.label))
        .label_style(("sans-serif", fonts.tick_label))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut colors = ColorCycle::new();
    for entry in series {
        let color = colors.next();
        chart
            .draw_series(LineSeries::new(
                entry.points.iter().cloned(),
                color.stroke_width(3),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(entry.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
    }

    draw_legend(&mut chart, fonts)?;
    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Creates a scatter of observed points with overlaid predicted curves
///
/// The wage-regression chart: observed group means as semi-transparent
/// circles labelled "data", plus one predicted curve per entry of `curves`
/// (male and female in the source projects).
pub fn create_scatter_with_curves(
    points: &[(f64, f64)],
    curves: &[LabeledSeries],
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
    fonts: &FontSizes,
) -> Result<()> {
    let mut all_points = points.to_vec();
    all_points.extend(curves.iter().flat_map(|c| c.points.clone()));
    validate_points(&all_points)?;

    let (x_range, y_range) = axis_ranges(&all_points);
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", fonts.title))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .x_label_style(("sans-serif", fonts.label))
        .y_desc(y_label)
        .y_label_style(("sans-serif", fonts.label))
        .label_style(("sans-serif", fonts.tick_label))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Observed means as semi-transparent points, matching the alpha scatter
    // of the source plots
    let data_style = BLACK.mix(0.5).filled();
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, data_style)),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("data")
        .legend(move |(x, y)| Circle::new((x + 10, y), 5, data_style));

    let mut colors = ColorCycle::new();
    for curve in curves {
        let color = colors.next();
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().cloned(),
                color.stroke_width(3),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(curve.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
    }

    draw_legend(&mut chart, fonts)?;
    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Creates a per-bin percentage chart bracketed by confidence bounds
///
/// Draws the point-estimate line plus lower and upper confidence-bound lines
/// in a lighter shade of the same color. The Y-axis is fixed to 0-100%.
/// Bins with a NaN estimate or no interval are skipped.
///
/// # Arguments
/// * `edges` - Bin edges (X positions), aligned with `percentages`
/// * `percentages` - Point estimates per bin; finite values must lie in 0-100
/// * `intervals` - Per-bin confidence intervals, `None` where undefined
/// * `title` - Chart title displayed at the top of the plot
/// * `x_label` - Label for the X-axis
/// * `output_path` - Path where the PNG file should be saved
/// * `fonts` - Font sizes for all text elements
pub fn create_percentage_ci_plot(
    edges: &[f64],
    percentages: &[f64],
    intervals: &[Option<ConfidenceInterval>],
    title: &str,
    x_label: &str,
    output_path: &Path,
    fonts: &FontSizes,
) -> Result<()> {
    if edges.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }
    if edges.len() != percentages.len() || edges.len() != intervals.len() {
        return Err(PlotError::InvalidData(format!(
            "Edges ({}), percentages ({}), and intervals ({}) must have equal lengths",
            edges.len(),
            percentages.len(),
            intervals.len()
        )));
    }
    for &value in percentages.iter().filter(|v| v.is_finite()) {
        if !(0.0..=100.0).contains(&value) {
            return Err(PlotError::InvalidData(format!(
                "Percentage {:.2} is outside valid range 0-100",
                value
            )));
        }
    }

    let estimate_points: Vec<(f64, f64)> = edges
        .iter()
        .zip(percentages)
        .filter(|(_, p)| p.is_finite())
        .map(|(&e, &p)| (e, p))
        .collect();
    if estimate_points.is_empty() {
        return Err(PlotError::InvalidData(
            "All bins are empty; nothing to plot".to_string(),
        ));
    }

    let lower_points: Vec<(f64, f64)> = edges
        .iter()
        .zip(intervals)
        .filter_map(|(&e, ci)| ci.map(|ci| (e, ci.lower)))
        .collect();
    let upper_points: Vec<(f64, f64)> = edges
        .iter()
        .zip(intervals)
        .filter_map(|(&e, ci)| ci.map(|ci| (e, ci.upper)))
        .collect();

    let x_min = edges.first().copied().unwrap_or(0.0);
    let mut x_max = edges.last().copied().unwrap_or(1.0);
    if x_min >= x_max {
        x_max = x_min + 1.0;
    }

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", fonts.title))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, 0.0..100.0)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .x_label_style(("sans-serif", fonts.label))
        .y_desc("Percentage (%)")
        .y_label_style(("sans-serif", fonts.label))
        .label_style(("sans-serif", fonts.tick_label))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut colors = ColorCycle::new();
    let color = colors.next();

    chart
        .draw_series(LineSeries::new(
            estimate_points.into_iter(),
            color.stroke_width(3),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("estimate")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
        });

    let bound_style = color.mix(0.4).stroke_width(2);
    for (points, label) in [(lower_points, "lower bound"), (upper_points, "upper bound")] {
        if points.is_empty() {
            continue;
        }
        let legend_style = bound_style;
        chart
            .draw_series(LineSeries::new(points.into_iter(), bound_style))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], legend_style));
    }

    draw_legend(&mut chart, fonts)?;
    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a, CT: CoordTranslate>(
    chart: &mut ChartContext<'a, DB, CT>,
    fonts: &FontSizes,
) -> Result<()> {
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", fonts.legend))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))
}

fn validate_points(points: &[(f64, f64)]) -> Result<()> {
    if points.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }
    for &(x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            return Err(PlotError::InvalidData(format!(
                "Point ({}, {}) is not finite",
                x, y
            )));
        }
    }
    Ok(())
}

fn axis_ranges(points: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let x_min = points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let x_max = points
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_min = points.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let y_max = points
        .iter()
        .map(|(_, y)| *y)
        .fold(f64::NEG_INFINITY, f64::max);

    // Degenerate ranges get a unit of padding so the chart still builds
    let x_max = if x_min >= x_max { x_min + 1.0 } else { x_max };
    let (y_min, y_max) = if y_min >= y_max {
        (y_min - 1.0, y_max + 1.0)
    } else {
        // Pad the Y-axis slightly so extreme points stay off the border
        let pad = (y_max - y_min) * 0.05;
        (y_min - pad, y_max + pad)
    };
    (x_min..x_max, y_min..y_max)
}
