//! Kaplan-Meier estimation over ADaM BDS time-to-event tables.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use adtte_ingest::{column_f64, column_strings, is_numeric_dtype, parse_f64};
use adtte_model::columns::{AVAL, CNSR, PARAM, PARAMCD};
use adtte_model::{
    AdtteError, ConfType, ConfidenceSettings, EstimateOptions, FitCall, OVERALL, ParamMeta,
    Result, Stratum, SurvivalFit,
};

use crate::estimator::{Estimator, KaplanMeier, StratumCurve, SurvivalGroup};

/// Estimates Kaplan-Meier curves with the default product-limit estimator.
///
/// `strata` lists the stratification columns; an empty slice fits a single
/// curve labelled `Overall`. Rows with a missing `AVAL`, `CNSR` or stratum
/// value are dropped. The returned fit starts every stratum at time zero.
///
/// # Errors
///
/// - [`AdtteError::MissingColumns`] when a stratum column, `CNSR` or `AVAL`
///   is absent
/// - [`AdtteError::NonNumericColumn`] when `AVAL` or `CNSR` is not numeric
/// - [`AdtteError::NoRows`] when no complete rows remain
/// - [`AdtteError::NegativeTime`] when a complete row has a negative `AVAL`
pub fn estimate_km(df: &DataFrame, strata: &[&str], options: &EstimateOptions) -> Result<SurvivalFit> {
    estimate_km_with(&KaplanMeier, df, strata, options)
}

/// Same as [`estimate_km`] with a caller-supplied estimator.
pub fn estimate_km_with<E: Estimator + ?Sized>(
    estimator: &E,
    df: &DataFrame,
    strata: &[&str],
    options: &EstimateOptions,
) -> Result<SurvivalFit> {
    let span = info_span!("estimate_km", strata = ?strata, rows = df.height());
    let _guard = span.enter();

    validate_columns(df, strata)?;
    options.validate()?;

    let rows = complete_rows(df, strata)?;
    let dropped = df.height() - rows.len();
    if dropped > 0 {
        debug!(dropped, "dropped rows with missing time, censoring or strata");
    }

    let groups = group_rows(df, strata, &rows)?;
    let formula = build_formula(strata);
    debug!(%formula, groups = groups.len(), "fitting survival curves");

    let mut curves = Vec::with_capacity(groups.len());
    for group in &groups {
        curves.push((group.label.clone(), group.len(), estimator.fit_group(group, options)?));
    }

    let call = FitCall {
        formula,
        strata: strata.iter().map(|s| (*s).to_string()).collect(),
        options: options.clone(),
    };
    let mut fit = assemble(curves, call);
    fit.param = param_meta(df, strata, &rows)?;

    info!(
        strata = fit.strata.len(),
        subjects = rows.len(),
        "fitted Kaplan-Meier curves"
    );
    Ok(fit)
}

/// Builds the model formula, e.g. `Surv(AVAL, 1 - CNSR) ~ TRTP + SEX`.
pub fn build_formula(strata: &[&str]) -> String {
    let rhs = if strata.is_empty() {
        "1".to_string()
    } else {
        strata.join(" + ")
    };
    format!("Surv({AVAL}, 1 - {CNSR}) ~ {rhs}")
}

fn validate_columns(df: &DataFrame, strata: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    let missing: Vec<String> = strata
        .iter()
        .copied()
        .chain([CNSR, AVAL])
        .filter(|name| !present.iter().any(|p| p.as_str() == *name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(AdtteError::MissingColumns { columns: missing });
    }

    for name in [AVAL, CNSR] {
        let dtype = df.column(name)?.dtype();
        if !is_numeric_dtype(dtype) {
            return Err(AdtteError::NonNumericColumn {
                column: name.to_string(),
                dtype: dtype.to_string(),
            });
        }
    }
    Ok(())
}

/// Complete observation: row index, time and event flag.
struct Observation {
    row: usize,
    time: f64,
    event: bool,
}

fn complete_rows(df: &DataFrame, strata: &[&str]) -> Result<Vec<Observation>> {
    let time = column_f64(df, AVAL)?;
    let cnsr = column_f64(df, CNSR)?;
    let strata_values = strata
        .iter()
        .map(|name| column_strings(df, name))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let rows: Vec<Observation> = (0..df.height())
        .filter(|&idx| strata_values.iter().all(|values| values[idx].is_some()))
        .filter_map(|idx| match (time[idx], cnsr[idx]) {
            (Some(t), Some(c)) => Some(Observation {
                row: idx,
                time: t,
                event: c == 0.0,
            }),
            _ => None,
        })
        .collect();

    if rows.is_empty() {
        let mut columns = vec![AVAL.to_string(), CNSR.to_string()];
        columns.extend(strata.iter().map(|s| (*s).to_string()));
        return Err(AdtteError::NoRows { columns });
    }

    // curves are anchored at time zero
    let negative = rows.iter().filter(|o| o.time < 0.0).count();
    if negative > 0 {
        return Err(AdtteError::NegativeTime {
            column: AVAL.to_string(),
            count: negative,
        });
    }
    Ok(rows)
}

fn group_rows(df: &DataFrame, strata: &[&str], rows: &[Observation]) -> Result<Vec<SurvivalGroup>> {
    if strata.is_empty() {
        return Ok(vec![SurvivalGroup {
            label: OVERALL.to_string(),
            time: rows.iter().map(|o| o.time).collect(),
            event: rows.iter().map(|o| o.event).collect(),
        }]);
    }

    let mut columns = Vec::with_capacity(strata.len());
    for name in strata {
        let values = column_strings(df, name)?;
        let levels: BTreeMap<String, usize> =
            sorted_levels(rows.iter().filter_map(|o| values[o.row].clone()))
                .into_iter()
                .enumerate()
                .map(|(rank, level)| (level, rank))
                .collect();
        columns.push((*name, values, levels));
    }

    let mut groups: BTreeMap<Vec<usize>, SurvivalGroup> = BTreeMap::new();
    for obs in rows {
        let mut key = Vec::with_capacity(columns.len());
        let mut parts = Vec::with_capacity(columns.len());
        for (name, values, levels) in &columns {
            let value = values[obs.row].as_deref().unwrap_or_default();
            key.push(levels.get(value).copied().unwrap_or(usize::MAX));
            parts.push(format!("{name}={value}"));
        }
        let group = groups.entry(key).or_insert_with(|| SurvivalGroup {
            label: parts.join(", "),
            time: Vec::new(),
            event: Vec::new(),
        });
        group.time.push(obs.time);
        group.event.push(obs.event);
    }
    Ok(groups.into_values().collect())
}

/// Distinct levels, numerically ordered when every level is a number.
fn sorted_levels(values: impl Iterator<Item = String>) -> Vec<String> {
    let levels: Vec<String> = values.collect::<BTreeSet<_>>().into_iter().collect();
    let numeric: Option<Vec<f64>> = levels.iter().map(|l| parse_f64(l)).collect();
    match numeric {
        Some(keys) => {
            let mut paired: Vec<(f64, String)> = keys.into_iter().zip(levels).collect();
            paired.sort_by(|a, b| a.0.total_cmp(&b.0));
            paired.into_iter().map(|(_, level)| level).collect()
        }
        None => levels,
    }
}

/// Prepends the time-zero anchor to every curve and flattens the strata.
fn assemble(curves: Vec<(String, usize, StratumCurve)>, call: FitCall) -> SurvivalFit {
    let options = &call.options;
    let with_bounds = options.conf_type != ConfType::None
        && curves
            .iter()
            .all(|(_, _, c)| c.lower.is_some() && c.upper.is_some());
    let total: usize = curves.iter().map(|(_, _, c)| c.len() + 1).sum();

    let mut fit = SurvivalFit {
        time: Vec::with_capacity(total),
        n_risk: Vec::with_capacity(total),
        n_event: Vec::with_capacity(total),
        n_censor: Vec::with_capacity(total),
        surv: Vec::with_capacity(total),
        std_err: Vec::with_capacity(total),
        cumhaz: Vec::with_capacity(total),
        lower: with_bounds.then(|| Vec::with_capacity(total)),
        upper: with_bounds.then(|| Vec::with_capacity(total)),
        strata: Vec::with_capacity(curves.len()),
        n: Vec::with_capacity(curves.len()),
        conf: with_bounds.then_some(ConfidenceSettings {
            level: options.conf_int,
            conf_type: options.conf_type,
        }),
        param: None,
        call,
    };

    for (label, n, curve) in curves {
        fit.time.push(0.0);
        fit.n_risk.push(n);
        fit.n_event.push(0);
        fit.n_censor.push(0);
        fit.surv.push(1.0);
        fit.std_err.push(0.0);
        fit.cumhaz.push(0.0);

        fit.time.extend(&curve.time);
        fit.n_risk.extend(&curve.n_risk);
        fit.n_event.extend(&curve.n_event);
        fit.n_censor.extend(&curve.n_censor);
        fit.surv.extend(&curve.surv);
        fit.std_err.extend(&curve.std_err);
        fit.cumhaz.extend(&curve.cumhaz);
        if let (Some(lower), Some(upper)) = (fit.lower.as_mut(), fit.upper.as_mut()) {
            lower.push(1.0);
            upper.push(1.0);
            lower.extend(curve.lower.iter().flatten());
            upper.extend(curve.upper.iter().flatten());
        }

        fit.strata.push(Stratum {
            label,
            len: curve.len() + 1,
        });
        fit.n.push(n);
    }
    fit
}

/// Single-valued PARAM/PARAMCD of the analyzed rows, unless used as a stratum.
fn param_meta(df: &DataFrame, strata: &[&str], rows: &[Observation]) -> Result<Option<ParamMeta>> {
    let single_value = |name: &str| -> Result<Option<String>> {
        if strata.contains(&name) || df.column(name).is_err() {
            return Ok(None);
        }
        let values = column_strings(df, name)?;
        let mut observed = rows.iter().filter_map(|o| values[o.row].as_deref());
        let Some(first) = observed.next() else {
            return Ok(None);
        };
        Ok(observed.all(|value| value == first).then(|| first.to_string()))
    };
    let meta = ParamMeta {
        param: single_value(PARAM)?,
        paramcd: single_value(PARAMCD)?,
    };
    Ok((!meta.is_empty()).then_some(meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_without_strata() {
        assert_eq!(build_formula(&[]), "Surv(AVAL, 1 - CNSR) ~ 1");
    }

    #[test]
    fn formula_with_strata() {
        assert_eq!(
            build_formula(&["TRTP", "SEX"]),
            "Surv(AVAL, 1 - CNSR) ~ TRTP + SEX"
        );
    }

    #[test]
    fn numeric_levels_sort_numerically() {
        let levels = sorted_levels(["81", "0", "54", "0"].into_iter().map(String::from));
        assert_eq!(levels, vec!["0", "54", "81"]);
    }

    #[test]
    fn repeated_levels_collapse() {
        let levels = sorted_levels(["B", "A", "B", "A", "B"].into_iter().map(String::from));
        assert_eq!(levels, vec!["A", "B"]);
    }

    #[test]
    fn text_levels_sort_alphabetically() {
        let levels = sorted_levels(
            ["Xanomeline Low Dose", "Placebo", "Xanomeline High Dose"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(
            levels,
            vec!["Placebo", "Xanomeline High Dose", "Xanomeline Low Dose"]
        );
    }
}
