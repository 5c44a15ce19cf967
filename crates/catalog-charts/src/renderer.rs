//! Chart rendering interface shared by the menu and the report view.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to prepare chart output: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = core::result::Result<T, ChartError>;

/// A named series of values for multi-series charts.
pub type Series = (String, Vec<usize>);

/// Something that can turn label/value data into chart files.
///
/// `file_name` is relative to the renderer's output location; every method
/// returns the path of the file it wrote.
pub trait ChartRenderer {
    fn render_bar(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf>;

    fn render_line(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf>;

    fn render_pie(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &Path,
    ) -> Result<PathBuf>;

    /// Grouped bars: one group per x label, one bar per series.
    fn render_multi_series_bar(
        &mut self,
        title: &str,
        x_labels: &[String],
        series: &[Series],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf>;

    fn render_multi_series_line(
        &mut self,
        title: &str,
        x_labels: &[String],
        series: &[Series],
        file_name: &Path,
        x_label: &str,
        y_label: &str,
    ) -> Result<PathBuf>;
}

/// Reject label/value sets no chart can be drawn from.
pub fn validate_single_series(labels: &[String], values: &[usize]) -> Result<()> {
    if labels.is_empty() {
        return Err(ChartError::InvalidData("Data cannot be empty".to_string()));
    }
    if labels.len() != values.len() {
        return Err(ChartError::InvalidData(format!(
            "{} labels but {} values",
            labels.len(),
            values.len()
        )));
    }
    Ok(())
}

/// Reject multi-series data whose series do not line up with the x labels.
pub fn validate_multi_series(x_labels: &[String], series: &[Series]) -> Result<()> {
    if x_labels.is_empty() || series.is_empty() {
        return Err(ChartError::InvalidData("Data cannot be empty".to_string()));
    }
    if let Some((name, values)) = series.iter().find(|(_, v)| v.len() != x_labels.len()) {
        return Err(ChartError::InvalidData(format!(
            "Series '{}' has {} values for {} labels",
            name,
            values.len(),
            x_labels.len()
        )));
    }
    Ok(())
}
