//! Curve transforms and their display defaults.
//!
//! Each [`Transform`] is a row of a fixed table holding the function applied
//! to survival estimates, the default y-axis label, and the rule used to
//! propose y-axis breaks.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AdtteError, Result};

/// Named transform of a survival estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Identity: the survival probability itself.
    Surv,
    /// Natural log of survival.
    Log,
    /// Complement: failure probability `1 - S`.
    Event,
    /// Complementary log-log: `log(-log(S))`.
    Cloglog,
    /// Survival as a percentage.
    Pct,
    /// Log of survival as a percentage.
    Logpct,
    /// Negated log: cumulative hazard `-log(S)`.
    Cumhaz,
}

/// How default y-axis breaks are proposed for a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickRule {
    /// Pretty breaks over a fixed range.
    Fixed { lo: f64, hi: f64 },
    /// Pretty breaks over the rounded min/max of the transformed estimates.
    RoundedRange,
}

struct TransformInfo {
    name: &'static str,
    apply: fn(f64) -> f64,
    y_label: &'static str,
    y_ticks: TickRule,
}

fn identity(y: f64) -> f64 {
    y
}

fn log(y: f64) -> f64 {
    y.ln()
}

fn complement(y: f64) -> f64 {
    1.0 - y
}

fn cloglog(y: f64) -> f64 {
    (-y.ln()).ln()
}

fn percentage(y: f64) -> f64 {
    y * 100.0
}

fn log_percentage(y: f64) -> f64 {
    (y * 100.0).ln()
}

fn negated_log(y: f64) -> f64 {
    -y.ln()
}

// Indexed by `Transform as usize`; keep in declaration order.
const TABLE: [TransformInfo; 7] = [
    TransformInfo {
        name: "surv",
        apply: identity,
        y_label: "Survival Probability",
        y_ticks: TickRule::Fixed { lo: 0.0, hi: 1.0 },
    },
    TransformInfo {
        name: "log",
        apply: log,
        y_label: "log(Survival Probability)",
        y_ticks: TickRule::RoundedRange,
    },
    TransformInfo {
        name: "event",
        apply: complement,
        y_label: "Failure Probability",
        y_ticks: TickRule::Fixed { lo: 0.0, hi: 1.0 },
    },
    TransformInfo {
        name: "cloglog",
        apply: cloglog,
        y_label: "log(-log(Survival Probability))",
        y_ticks: TickRule::RoundedRange,
    },
    TransformInfo {
        name: "pct",
        apply: percentage,
        y_label: "Survival Probability (%)",
        y_ticks: TickRule::Fixed { lo: 0.0, hi: 100.0 },
    },
    TransformInfo {
        name: "logpct",
        apply: log_percentage,
        y_label: "log(Survival Probability (%))",
        y_ticks: TickRule::Fixed { lo: 0.0, hi: 5.0 },
    },
    TransformInfo {
        name: "cumhaz",
        apply: negated_log,
        y_label: "cumulative hazard",
        y_ticks: TickRule::RoundedRange,
    },
];

impl Transform {
    /// Every transform, in table order.
    pub const ALL: [Transform; 7] = [
        Transform::Surv,
        Transform::Log,
        Transform::Event,
        Transform::Cloglog,
        Transform::Pct,
        Transform::Logpct,
        Transform::Cumhaz,
    ];

    fn info(self) -> &'static TransformInfo {
        &TABLE[self as usize]
    }

    /// Returns the name used to select the transform.
    pub fn as_str(self) -> &'static str {
        self.info().name
    }

    /// Applies the transform to a single survival estimate.
    pub fn apply(self, y: f64) -> f64 {
        (self.info().apply)(y)
    }

    /// Default y-axis label for the transformed curve.
    pub fn y_label(self) -> &'static str {
        self.info().y_label
    }

    /// Rule for proposing default y-axis breaks.
    pub fn tick_rule(self) -> TickRule {
        self.info().y_ticks
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transform {
    type Err = AdtteError;

    fn from_str(s: &str) -> Result<Self> {
        Transform::ALL
            .into_iter()
            .find(|transform| transform.as_str() == s)
            .ok_or_else(|| AdtteError::UnknownTransform(s.to_string()))
    }
}

/// Caller-supplied transform.
#[derive(Clone)]
pub struct CustomFun(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl CustomFun {
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, y: f64) -> f64 {
        (self.0)(y)
    }
}

impl fmt::Debug for CustomFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomFun(..)")
    }
}

/// Transform requested for a plot.
///
/// Names are only looked up when the plot is built, so a typo surfaces as
/// [`AdtteError::UnknownTransform`] from the plot call.
#[derive(Debug, Clone)]
pub enum CurveFun {
    /// Transform selected by name.
    Name(String),
    /// Transform selected from the table.
    Transform(Transform),
    /// Caller-supplied function; needs an explicit y-axis label.
    Custom(CustomFun),
}

impl CurveFun {
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        CurveFun::Custom(CustomFun::new(f))
    }

    /// Looks up named transforms; custom functions are passed through unapplied.
    pub fn resolve(&self) -> Result<ResolvedFun> {
        match self {
            CurveFun::Name(name) => name.parse().map(ResolvedFun::Named),
            CurveFun::Transform(transform) => Ok(ResolvedFun::Named(*transform)),
            CurveFun::Custom(custom) => Ok(ResolvedFun::Custom(custom.clone())),
        }
    }
}

impl From<Transform> for CurveFun {
    fn from(transform: Transform) -> Self {
        CurveFun::Transform(transform)
    }
}

impl From<&str> for CurveFun {
    fn from(name: &str) -> Self {
        CurveFun::Name(name.to_string())
    }
}

impl From<String> for CurveFun {
    fn from(name: String) -> Self {
        CurveFun::Name(name)
    }
}

impl From<CustomFun> for CurveFun {
    fn from(custom: CustomFun) -> Self {
        CurveFun::Custom(custom)
    }
}

/// A transform ready to be applied.
#[derive(Debug, Clone)]
pub enum ResolvedFun {
    Named(Transform),
    Custom(CustomFun),
}

impl ResolvedFun {
    pub fn apply(&self, y: f64) -> f64 {
        match self {
            ResolvedFun::Named(transform) => transform.apply(y),
            ResolvedFun::Custom(custom) => custom.apply(y),
        }
    }

    /// Returns the table entry, or `None` for custom functions.
    pub fn transform(&self) -> Option<Transform> {
        match self {
            ResolvedFun::Named(transform) => Some(*transform),
            ResolvedFun::Custom(_) => None,
        }
    }
}
