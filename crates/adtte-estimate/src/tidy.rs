//! Tabular views of a fitted survival object.

use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};

use adtte_model::{Result, SurvivalFit};

/// Column names of [`tidy`], in order.
pub const TIDY_COLUMNS: [&str; 10] = [
    "strata",
    "time",
    "n.risk",
    "n.event",
    "n.censor",
    "estimate",
    "std.error",
    "conf.low",
    "conf.high",
    "cumhaz",
];

/// Flattens a fit into one row per time point and stratum.
///
/// `conf.low` and `conf.high` are null when the fit carries no bounds.
pub fn tidy(fit: &SurvivalFit) -> Result<DataFrame> {
    let rows: Vec<_> = fit.rows().collect();
    let strata: Vec<&str> = rows.iter().map(|r| r.stratum).collect();
    let time: Vec<f64> = rows.iter().map(|r| r.time).collect();
    let n_risk: Vec<u64> = rows.iter().map(|r| r.n_risk as u64).collect();
    let n_event: Vec<u64> = rows.iter().map(|r| r.n_event as u64).collect();
    let n_censor: Vec<u64> = rows.iter().map(|r| r.n_censor as u64).collect();
    let estimate: Vec<f64> = rows.iter().map(|r| r.surv).collect();
    let std_error: Vec<f64> = rows.iter().map(|r| r.std_err).collect();
    let conf_low: Vec<Option<f64>> = rows.iter().map(|r| r.lower).collect();
    let conf_high: Vec<Option<f64>> = rows.iter().map(|r| r.upper).collect();
    let cumhaz: Vec<f64> = rows.iter().map(|r| r.cumhaz).collect();

    let [c_strata, c_time, c_risk, c_event, c_censor, c_est, c_se, c_low, c_high, c_haz] =
        TIDY_COLUMNS;
    let df = DataFrame::new(vec![
        Column::new(c_strata.into(), strata),
        Column::new(c_time.into(), time),
        Column::new(c_risk.into(), n_risk),
        Column::new(c_event.into(), n_event),
        Column::new(c_censor.into(), n_censor),
        Column::new(c_est.into(), estimate),
        Column::new(c_se.into(), std_error),
        Column::new(c_low.into(), conf_low),
        Column::new(c_high.into(), conf_high),
        Column::new(c_haz.into(), cumhaz),
    ])?;
    Ok(df)
}

/// Per-stratum counts and median survival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratumSummary {
    pub strata: String,
    pub n: usize,
    pub events: usize,
    /// `None` when the curve never drops to one half.
    pub median: Option<f64>,
    pub median_lower: Option<f64>,
    pub median_upper: Option<f64>,
}

/// Summarizes each stratum of a fit.
///
/// The median is the earliest time the estimate reaches 0.5. When the curve
/// sits exactly at 0.5, the midpoint to the next drop is used. Confidence
/// limits apply the same rule to the upper and lower bounds.
pub fn summarize(fit: &SurvivalFit) -> Vec<StratumSummary> {
    fit.stratum_ranges()
        .zip(&fit.n)
        .map(|((stratum, range), &n)| {
            let time = &fit.time[range.clone()];
            let events: usize = fit.n_event[range.clone()].iter().sum();
            let bound = |values: &Option<Vec<f64>>| {
                values
                    .as_ref()
                    .and_then(|v| median_time(time, &v[range.clone()]))
            };
            StratumSummary {
                strata: stratum.label.clone(),
                n,
                events,
                median: median_time(time, &fit.surv[range.clone()]),
                median_lower: bound(&fit.upper),
                median_upper: bound(&fit.lower),
            }
        })
        .collect()
}

const HALF_TOLERANCE: f64 = 1e-8;

fn median_time(time: &[f64], curve: &[f64]) -> Option<f64> {
    let idx = curve
        .iter()
        .position(|&s| !s.is_nan() && s <= 0.5 + HALF_TOLERANCE)?;
    if (curve[idx] - 0.5).abs() > HALF_TOLERANCE {
        return Some(time[idx]);
    }
    let next_drop = curve[idx..]
        .iter()
        .position(|&s| s < 0.5 - HALF_TOLERANCE)
        .map(|offset| time[idx + offset]);
    Some(next_drop.map_or(time[idx], |t| (time[idx] + t) / 2.0))
}

/// Subjects at risk in one stratum at one requested time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub strata: String,
    pub time: f64,
    pub n_risk: usize,
}

/// Number at risk per stratum at each requested time.
///
/// At a time between two rows, the count is the number at risk at the next
/// row, or zero after the last one.
pub fn risk_table(fit: &SurvivalFit, times: &[f64]) -> Vec<RiskRow> {
    let mut table = Vec::with_capacity(fit.strata.len() * times.len());
    for (stratum, range) in fit.stratum_ranges() {
        let stratum_time = &fit.time[range.clone()];
        let stratum_risk = &fit.n_risk[range.clone()];
        for &t in times {
            // rows before `t` have already left the risk set
            let n_risk = stratum_time
                .iter()
                .position(|&rt| rt >= t)
                .map_or(0, |idx| stratum_risk[idx]);
            table.push(RiskRow {
                strata: stratum.label.clone(),
                time: t,
                n_risk,
            });
        }
    }
    table
}
