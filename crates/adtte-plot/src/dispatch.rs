//! Dispatch over fitted object kinds.

use adtte_model::{AdtteError, FittedObject, PlotOptions, Result, SurvivalFit};

use crate::survival::{SurvivalPlot, plot_survfit};

/// A fitted object that knows how to draw itself.
pub trait Plottable {
    fn plot(&self, options: &PlotOptions) -> Result<SurvivalPlot>;
}

impl Plottable for SurvivalFit {
    fn plot(&self, options: &PlotOptions) -> Result<SurvivalPlot> {
        plot_survfit(self, options)
    }
}

impl Plottable for FittedObject {
    fn plot(&self, options: &PlotOptions) -> Result<SurvivalPlot> {
        match self {
            FittedObject::Survival(fit) => plot_survfit(fit, options),
            FittedObject::Unsupported { kind } => Err(AdtteError::UnsupportedObject {
                kind: kind.clone(),
            }),
        }
    }
}

/// Draws any [`Plottable`] object.
///
/// # Errors
///
/// - [`AdtteError::UnsupportedObject`] for fitted objects that are not survival fits
/// - [`AdtteError::InvalidLegendPosition`] / [`AdtteError::InvalidLegendCoordinates`]
/// - [`AdtteError::UnknownTransform`] for a transform name outside the table
/// - [`AdtteError::MissingYLabel`] for a custom transform without a y-axis label
pub fn plot<P: Plottable + ?Sized>(object: &P, options: &PlotOptions) -> Result<SurvivalPlot> {
    object.plot(options)
}
