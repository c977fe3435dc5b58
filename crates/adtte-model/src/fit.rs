//! Fitted survival curves.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::options::{ConfType, EstimateOptions};

/// Label used when no stratification was requested.
pub const OVERALL: &str = "Overall";

/// One stratum of a fit and the number of rows it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stratum {
    pub label: String,
    pub len: usize,
}

/// Single-valued PARAM/PARAMCD metadata of the analyzed parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamMeta {
    pub param: Option<String>,
    pub paramcd: Option<String>,
}

impl ParamMeta {
    pub fn is_empty(&self) -> bool {
        self.param.is_none() && self.paramcd.is_none()
    }
}

/// Confidence interval settings used by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSettings {
    pub level: f64,
    pub conf_type: ConfType,
}

/// Resolved model description and the options the estimator received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitCall {
    pub formula: String,
    pub strata: Vec<String>,
    pub options: EstimateOptions,
}

/// Kaplan-Meier fit over one or more strata.
///
/// Per-row vectors are parallel and grouped by stratum in the order of
/// [`SurvivalFit::strata`]. Every stratum starts with a time-zero row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalFit {
    pub time: Vec<f64>,
    pub n_risk: Vec<usize>,
    pub n_event: Vec<usize>,
    pub n_censor: Vec<usize>,
    pub surv: Vec<f64>,
    /// Standard error of the cumulative hazard (Greenwood).
    pub std_err: Vec<f64>,
    /// Nelson-Aalen cumulative hazard.
    pub cumhaz: Vec<f64>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
    pub strata: Vec<Stratum>,
    /// Subjects per stratum.
    pub n: Vec<usize>,
    pub conf: Option<ConfidenceSettings>,
    pub param: Option<ParamMeta>,
    pub call: FitCall,
}

/// Borrowed view of one row of a [`SurvivalFit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRow<'a> {
    pub stratum: &'a str,
    pub time: f64,
    pub n_risk: usize,
    pub n_event: usize,
    pub n_censor: usize,
    pub surv: f64,
    pub std_err: f64,
    pub cumhaz: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl SurvivalFit {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn strata_labels(&self) -> Vec<&str> {
        self.strata.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn has_conf_bounds(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Row ranges owned by each stratum.
    pub fn stratum_ranges(&self) -> impl Iterator<Item = (&Stratum, Range<usize>)> + '_ {
        self.strata.iter().scan(0usize, |start, stratum| {
            let range = *start..*start + stratum.len;
            *start = range.end;
            Some((stratum, range))
        })
    }

    fn row_unchecked<'a>(&'a self, idx: usize, stratum: &'a str) -> FitRow<'a> {
        FitRow {
            stratum,
            time: self.time[idx],
            n_risk: self.n_risk[idx],
            n_event: self.n_event[idx],
            n_censor: self.n_censor[idx],
            surv: self.surv[idx],
            std_err: self.std_err[idx],
            cumhaz: self.cumhaz[idx],
            lower: self.lower.as_ref().map(|v| v[idx]),
            upper: self.upper.as_ref().map(|v| v[idx]),
        }
    }

    /// Iterates over all rows, stratum by stratum.
    pub fn rows(&self) -> impl Iterator<Item = FitRow<'_>> + '_ {
        self.stratum_ranges().flat_map(move |(stratum, range)| {
            range.map(move |idx| self.row_unchecked(idx, stratum.label.as_str()))
        })
    }

    /// Smallest and largest time across all strata.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let min = self.time.iter().copied().reduce(f64::min)?;
        let max = self.time.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }

    /// PARAM value of the analyzed parameter, if one was attached.
    pub fn param_label(&self) -> Option<&str> {
        self.param.as_ref()?.param.as_deref()
    }
}
