//! Rendering errors.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors raised while drawing or saving a chart.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing backend rejected an operation.
    #[error("failed to draw chart: {0}")]
    Draw(String),

    /// The axis limits do not describe a drawable range.
    #[error("invalid {axis}-axis limits ({lo}, {hi})")]
    InvalidLimits { axis: char, lo: f64, hi: f64 },

    /// The image could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(err.to_string())
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
