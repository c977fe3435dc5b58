//! Transform-and-plot wrapper for Kaplan-Meier fits.
//!
//! [`plot`] takes a fitted object and [`PlotOptions`], applies the requested
//! curve transform to the estimate and its bounds, and returns a
//! [`SurvivalPlot`]: a declarative [`ChartSpec`] plus the transformed rows.
//! Drawing the chart is left to a backend such as `adtte-render`.
//!
//! [`PlotOptions`]: adtte_model::PlotOptions
//! [`ChartSpec`]: adtte_model::ChartSpec

mod dispatch;
mod survival;
pub mod ticks;

pub use dispatch::{Plottable, plot};
pub use survival::{PlotRow, SurvivalPlot, TRANSFORM_NA_WARNING, plot_survfit};
pub use ticks::pretty;
