//! Kaplan-Meier estimation for ADaM time-to-event datasets.
//!
//! [`estimate_km`] validates an ADTTE table, drops incomplete rows, fits one
//! curve per stratum through an [`Estimator`] and returns a [`SurvivalFit`]
//! anchored at time zero. [`tidy`], [`summarize`] and [`risk_table`] turn a
//! fit back into tables.
//!
//! [`SurvivalFit`]: adtte_model::SurvivalFit

mod estimator;
mod normal;
mod tidy;
mod wrapper;

pub use estimator::{Estimator, KaplanMeier, StratumCurve, SurvivalGroup, confidence_bounds};
pub use normal::{normal_quantile, z_critical};
pub use tidy::{RiskRow, StratumSummary, TIDY_COLUMNS, risk_table, summarize, tidy};
pub use wrapper::{build_formula, estimate_km, estimate_km_with};
