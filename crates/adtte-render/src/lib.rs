//! Rendering backend for survival chart specs.
//!
//! Draws a [`ChartSpec`](adtte_model::ChartSpec) as an SVG document with
//! `plotters`: stepped curves, confidence ribbons, censoring marks, the
//! requested axis breaks and a legend.

mod error;
mod svg;

pub use error::{RenderError, Result};
pub use svg::{DEFAULT_SIZE, render_svg, ribbon_outline, save_svg, step_path};
