//! PNG chart rendering using the [`plotters`] bitmap backend.
//!
//! Category charts place label `i` at x = `i` on a continuous axis spanning
//! `-0.5..n-0.5`, so bars and line points sit centred over their labels.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::renderer::{
    validate_multi_series, validate_single_series, ChartError, ChartRenderer, Result, Series,
};

const SINGLE_SERIES_SIZE: (u32, u32) = (1200, 800);
const MULTI_SERIES_SIZE: (u32, u32) = (1400, 840);
const PIE_SIZE: (u32, u32) = (900, 900);

/// Fraction of a category slot covered by its bar (or bar group).
const GROUP_WIDTH: f64 = 0.8;

/// Pie wedges start at twelve o'clock and run counter-clockwise.
const PIE_START_DEGREES: f64 = 90.0;

const CAPTION_FONT: (&str, i32) = ("sans-serif", 32);
const LABEL_FONT: (&str, i32) = ("sans-serif", 16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesStyle {
    Bar,
    Line,
}

/// Writes charts as PNG files into a fixed output directory.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    output_dir: PathBuf,
}

impl PlottersRenderer {
    /// Create a renderer writing into `output_dir`, creating it if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn target(&self, file_name: &Path) -> PathBuf {
        self.output_dir.join(file_name)
    }

    fn render_single(
        &self,
        style: SeriesStyle,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
        axes: (&str, &str),
    ) -> Result<PathBuf> {
        validate_single_series(labels, values)?;
        let path = self.target(file_name);
        let series = vec![(String::new(), values.to_vec())];
        draw_category_chart(&path, SINGLE_SERIES_SIZE, style, title, labels, &series, axes, false)?;
        debug!("Rendered {:?} chart to {}", style, path.display());
        Ok(path)
    }

    fn render_multi(
        &self,
        style: SeriesStyle,
        title: &str,
        x_labels: &[String],
        series: &[Series],
        file_name: &Path,
        axes: (&str, &str),
    ) -> Result<PathBuf> {
        validate_multi_series(x_labels, series)?;
        let path = self.target(file_name);
        draw_category_chart(&path, MULTI_SERIES_SIZE, style, title, x_labels, series, axes, true)?;
        debug!(
            "Rendered {:?} chart with {} series to {}",
            style,
            series.len(),
            path.display()
        );
        Ok(path)
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render_bar(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf> {
        self.render_single(SeriesStyle::Bar, title, labels, values, file_name, (x_label, y_label))
    }

    fn render_line(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf> {
        self.render_single(SeriesStyle::Line, title, labels, values, file_name, (x_label, y_label))
    }

    fn render_pie(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
    ) -> Result<PathBuf> {
        validate_single_series(labels, values)?;
        let wedges = pie_wedges(values)?;
        let path = self.target(file_name);
        draw_pie(&path, title, labels, &wedges)?;
        debug!("Rendered pie chart to {}", path.display());
        Ok(path)
    }

    fn render_multi_series_bar(
        &mut self,
        title: &str,
        x_labels: &[String],
        series: &[Series],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf> {
        self.render_multi(SeriesStyle::Bar, title, x_labels, series, file_name, (x_label, y_label))
    }

    fn render_multi_series_line(
        &mut self,
        title: &str,
        x_labels: &[String],
        series: &[Series],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf> {
        self.render_multi(SeriesStyle::Line, title, x_labels, series, file_name, (x_label, y_label))
    }
}

// ── Layout helpers ────────────────────────────────────────────────────────────

/// Horizontal extent `(left, right)` of bar `index` out of `count` bars in
/// the group centred on category `category`.
fn bar_span(category: usize, index: usize, count: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / count.max(1) as f64;
    let left = category as f64 - GROUP_WIDTH / 2.0 + index as f64 * width;
    (left, left + width)
}

/// Upper bound of the value axis, leaving headroom above the tallest point.
fn value_axis_max(series: &[Series]) -> f64 {
    let max = series
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .max()
        .unwrap_or(0);
    (max as f64 * 1.1).max(1.0)
}

/// Label for an axis position, empty between categories.
fn category_label(labels: &[String], position: f64) -> String {
    let nearest = position.round();
    if (position - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

/// One slice of a pie chart, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Wedge {
    start: f64,
    end: f64,
    share: f64,
}

impl Wedge {
    fn middle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

fn pie_wedges(values: &[usize]) -> Result<Vec<Wedge>> {
    let total: usize = values.iter().sum();
    if total == 0 {
        return Err(ChartError::InvalidData(
            "Pie chart values sum to zero".to_string(),
        ));
    }

    let mut start = PIE_START_DEGREES;
    Ok(values
        .iter()
        .map(|&value| {
            let share = value as f64 / total as f64;
            let end = start + share * 360.0;
            let wedge = Wedge { start, end, share };
            start = end;
            wedge
        })
        .collect())
}

/// Pixel position at `degrees` (counter-clockwise from three o'clock).
fn point_on_circle(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let radians = degrees * PI / 180.0;
    (
        center.0 + (radius * radians.cos()).round() as i32,
        center.1 - (radius * radians.sin()).round() as i32,
    )
}

/// Outline of a wedge: the centre followed by points along the arc.
fn wedge_outline(center: (i32, i32), radius: f64, wedge: &Wedge) -> Vec<(i32, i32)> {
    let steps = ((wedge.end - wedge.start).abs().ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = wedge.start + (wedge.end - wedge.start) * step as f64 / steps as f64;
        points.push(point_on_circle(center, radius, angle));
    }
    points
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn drawing_error(e: impl std::fmt::Display) -> ChartError {
    ChartError::Drawing(e.to_string())
}

#[allow(clippy::too_many_arguments)]
fn draw_category_chart(
    path: &Path,
    size: (u32, u32),
    style: SeriesStyle,
    title: &str,
    labels: &[String],
    series: &[Series],
    (x_label, y_label): (&str, &str),
    with_legend: bool,
) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let x_max = labels.len() as f64 - 0.5;
    let y_max = value_axis_max(series);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..x_max, 0f64..y_max)
        .map_err(|e| ChartError::ChartConfig(e.to_string()))?;

    let label_formatter = |x: &f64| category_label(labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&label_formatter)
        .y_label_formatter(&|y| format!("{:.0}", y))
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(drawing_error)?;

    for (index, (name, values)) in series.iter().enumerate() {
        let color = if with_legend {
            Palette99::pick(index).to_rgba()
        } else {
            BLUE.to_rgba()
        };

        let annotation = match style {
            SeriesStyle::Bar => chart
                .draw_series(values.iter().enumerate().map(|(category, &value)| {
                    let (left, right) = bar_span(category, index, series.len());
                    Rectangle::new([(left, 0.0), (right, value as f64)], color.filled())
                }))
                .map_err(drawing_error)?,
            SeriesStyle::Line => {
                let points: Vec<(f64, f64)> = values
                    .iter()
                    .enumerate()
                    .map(|(category, &value)| (category as f64, value as f64))
                    .collect();
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
                    .map_err(drawing_error)?;
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(drawing_error)?
            }
        };

        if with_legend {
            annotation.label(name.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(LABEL_FONT)
            .draw()
            .map_err(drawing_error)?;
    }

    root.present().map_err(drawing_error)?;
    Ok(())
}

fn draw_pie(path: &Path, title: &str, labels: &[String], wedges: &[Wedge]) -> Result<()> {
    let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;
    let area = root
        .titled(title, CAPTION_FONT)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    for (index, (wedge, label)) in wedges.iter().zip(labels).enumerate() {
        if wedge.share == 0.0 {
            continue;
        }
        let color = Palette99::pick(index).to_rgba();
        area.draw(&Polygon::new(
            wedge_outline(center, radius, wedge),
            color.filled(),
        ))
        .map_err(drawing_error)?;

        let anchor = point_on_circle(center, radius * 1.12, wedge.middle());
        area.draw(&Text::new(
            format!("{} {:.1}%", label, wedge.share * 100.0),
            anchor,
            LABEL_FONT,
        ))
        .map_err(drawing_error)?;
    }

    root.present().map_err(drawing_error)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
