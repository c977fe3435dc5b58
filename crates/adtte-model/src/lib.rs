//! Data model for ADaM time-to-event survival analysis.
//!
//! - **fit**: Kaplan-Meier fits anchored at time zero, with stratum labels
//!   and parameter metadata
//! - **transform**: the fixed table of curve transforms and their axis defaults
//! - **legend**: validated legend placements
//! - **chart**: declarative chart description consumed by renderers
//! - **options**: estimator and plot options

pub mod chart;
pub mod columns;
pub mod error;
pub mod fit;
pub mod legend;
pub mod object;
pub mod options;
pub mod transform;

pub use chart::{
    AxisSpec, ChartClass, ChartSpec, CurveLayer, PALETTE, Rgb, RibbonPoint, Theme, palette_color,
};
pub use error::{AdtteError, ErrorKind, Result};
pub use fit::{ConfidenceSettings, FitCall, FitRow, OVERALL, ParamMeta, Stratum, SurvivalFit};
pub use legend::{LegendPosition, LegendSpec};
pub use object::FittedObject;
pub use options::{ConfType, EstimateOptions, PlotOptions};
pub use transform::{CurveFun, CustomFun, ResolvedFun, TickRule, Transform};
