//! Transformed Kaplan-Meier curves and their chart description.

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use adtte_model::{
    AdtteError, AxisSpec, ChartClass, ChartSpec, CurveLayer, PlotOptions,
    ResolvedFun, Result, RibbonPoint, SurvivalFit, Theme, TickRule, Transform, palette_color,
};

use crate::ticks::{finite_range, pretty, rounded_range};

/// Warning raised when the complementary log-log path drops rows.
pub const TRANSFORM_NA_WARNING: &str = "NAs introduced by y-axis transformation";

const X_TICK_COUNT: usize = 10;
const Y_TICK_COUNT: usize = 5;

/// One transformed row of the plotted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRow {
    pub strata: String,
    pub time: f64,
    pub n_risk: usize,
    pub n_event: usize,
    pub n_censor: usize,
    pub est: f64,
    pub est_lower: Option<f64>,
    pub est_upper: Option<f64>,
}

/// A chart ready for a rendering backend, with the data behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPlot {
    pub chart: ChartSpec,
    pub data: Vec<PlotRow>,
    /// Non-fatal numerical warnings raised while transforming.
    pub warnings: Vec<String>,
}

/// Builds the chart for a survival fit.
pub fn plot_survfit(fit: &SurvivalFit, options: &PlotOptions) -> Result<SurvivalPlot> {
    let span = info_span!("plot_survfit", strata = fit.strata.len(), rows = fit.len());
    let _guard = span.enter();

    let legend = options.legend_position.resolve()?;
    let fun = options.fun.resolve()?;
    let y_label = match (&options.y_label, fun.transform()) {
        (Some(label), _) => label.clone(),
        (None, Some(transform)) => transform.y_label().to_string(),
        (None, None) => return Err(AdtteError::MissingYLabel),
    };

    let mut data = transform_rows(fit, &fun);
    guard_negative_infinity(&mut data);

    let mut warnings = Vec::new();
    if fun.transform() == Some(Transform::Cloglog) {
        let before = data.len();
        data.retain(|row| !row.est.is_infinite());
        let dropped = before - data.len();
        if dropped > 0 {
            warn!(dropped, "{}", TRANSFORM_NA_WARNING);
            warnings.push(TRANSFORM_NA_WARNING.to_string());
        }
    }

    let show_ribbons = options.show_ci && fit.has_conf_bounds();
    let x_axis = x_axis(fit, &data, options);
    let y_axis = y_axis(&data, &fun, y_label, options, show_ribbons);
    debug!(
        fun = fun.transform().map_or("custom", Transform::as_str),
        x_breaks = x_axis.breaks.len(),
        y_breaks = y_axis.breaks.len(),
        "resolved axes"
    );

    let curves = fit
        .strata
        .iter()
        .enumerate()
        .map(|(idx, stratum)| {
            curve_layer(
                &stratum.label,
                idx,
                &data,
                show_ribbons,
                options.show_censor,
            )
        })
        .collect();

    let chart = ChartSpec {
        classes: vec![ChartClass::SurvivalCurve, ChartClass::Chart],
        x_axis,
        y_axis,
        curves,
        legend,
        legend_title: fit.call.strata.join(", "),
        theme: Theme::default(),
    };

    Ok(SurvivalPlot {
        chart,
        data,
        warnings,
    })
}

fn transform_rows(fit: &SurvivalFit, fun: &ResolvedFun) -> Vec<PlotRow> {
    fit.rows()
        .map(|row| PlotRow {
            strata: row.stratum.to_string(),
            time: row.time,
            n_risk: row.n_risk,
            n_event: row.n_event,
            n_censor: row.n_censor,
            est: fun.apply(row.surv),
            est_lower: row.lower.map(|v| fun.apply(v)),
            est_upper: row.upper.map(|v| fun.apply(v)),
        })
        .collect()
}

/// Replaces negative infinity in each column with that column's smallest
/// finite value.
fn guard_negative_infinity(data: &mut [PlotRow]) {
    fn replace(values: Vec<&mut f64>) {
        let floor = values
            .iter()
            .map(|v| **v)
            .filter(|v| v.is_finite())
            .reduce(f64::min);
        if let Some(floor) = floor {
            for value in values {
                if *value == f64::NEG_INFINITY {
                    *value = floor;
                }
            }
        }
    }

    replace(data.iter_mut().map(|row| &mut row.est).collect());
    replace(data.iter_mut().filter_map(|row| row.est_lower.as_mut()).collect());
    replace(data.iter_mut().filter_map(|row| row.est_upper.as_mut()).collect());
}

fn x_axis(fit: &SurvivalFit, data: &[PlotRow], options: &PlotOptions) -> AxisSpec {
    let mut label = options
        .x_label
        .clone()
        .or_else(|| fit.param_label().map(str::to_string))
        .unwrap_or_else(|| "time".to_string());
    if let Some(units) = &options.x_units {
        label = format!("{label} ({units})");
    }

    let range = finite_range(data.iter().map(|row| row.time));
    let breaks = match (&options.x_ticks, range) {
        (Some(ticks), _) => ticks.clone(),
        (None, Some((lo, hi))) => pretty(lo, hi, X_TICK_COUNT),
        (None, None) => Vec::new(),
    };
    let limits = limits(&breaks, range);
    AxisSpec {
        label,
        breaks,
        limits,
    }
}

fn y_axis(
    data: &[PlotRow],
    fun: &ResolvedFun,
    label: String,
    options: &PlotOptions,
    with_bounds: bool,
) -> AxisSpec {
    let estimates = || data.iter().map(|row| row.est);
    let breaks = match (&options.y_ticks, fun.transform().map(Transform::tick_rule)) {
        (Some(ticks), _) => ticks.clone(),
        (None, Some(TickRule::Fixed { lo, hi })) => pretty(lo, hi, Y_TICK_COUNT),
        (None, Some(TickRule::RoundedRange)) => rounded_range(estimates(), Y_TICK_COUNT),
        (None, None) => match finite_range(estimates()) {
            Some((lo, hi)) => pretty(lo, hi, Y_TICK_COUNT),
            None => Vec::new(),
        },
    };

    let bounds = data
        .iter()
        .filter(|_| with_bounds)
        .flat_map(|row| [row.est_lower, row.est_upper])
        .flatten();
    let range = finite_range(estimates().chain(bounds));
    let limits = limits(&breaks, range);
    AxisSpec {
        label,
        breaks,
        limits,
    }
}

/// Smallest range holding both the breaks and the data.
fn limits(breaks: &[f64], data: Option<(f64, f64)>) -> (f64, f64) {
    let all = breaks
        .iter()
        .copied()
        .chain(data.into_iter().flat_map(|(lo, hi)| [lo, hi]));
    match finite_range(all) {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((lo, _)) => (lo - 0.5, lo + 0.5),
        None => (0.0, 1.0),
    }
}

fn curve_layer(
    label: &str,
    index: usize,
    data: &[PlotRow],
    with_ribbon: bool,
    with_censor: bool,
) -> CurveLayer {
    let rows: Vec<&PlotRow> = data.iter().filter(|row| row.strata == label).collect();
    let points = rows
        .iter()
        .filter(|row| row.est.is_finite())
        .map(|row| (row.time, row.est))
        .collect();
    let ribbon = with_ribbon.then(|| {
        rows.iter()
            .filter_map(|row| match (row.est_lower, row.est_upper) {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some(RibbonPoint {
                    x: row.time,
                    lower: a.min(b),
                    upper: a.max(b),
                }),
                _ => None,
            })
            .collect()
    });
    let censor_marks = if with_censor {
        rows.iter()
            .filter(|row| row.n_censor > 0 && row.est.is_finite())
            .map(|row| (row.time, row.est))
            .collect()
    } else {
        Vec::new()
    };

    CurveLayer {
        label: label.to_string(),
        color: palette_color(index),
        points,
        ribbon,
        censor_marks,
    }
}
