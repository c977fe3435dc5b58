//! Survival estimators.
//!
//! The wrapper in [`crate::wrapper`] only prepares data and post-processes
//! results; the curve itself comes from an [`Estimator`].

use adtte_model::{AdtteError, ConfType, EstimateOptions, Result};

use crate::normal::z_critical;

/// Observations of one stratum.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalGroup {
    pub label: String,
    pub time: Vec<f64>,
    /// `true` when the event was observed, `false` when censored.
    pub event: Vec<bool>,
}

impl SurvivalGroup {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Estimated curve for one stratum, one row per distinct observed time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StratumCurve {
    pub time: Vec<f64>,
    pub n_risk: Vec<usize>,
    pub n_event: Vec<usize>,
    pub n_censor: Vec<usize>,
    pub surv: Vec<f64>,
    pub std_err: Vec<f64>,
    pub cumhaz: Vec<f64>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
}

impl StratumCurve {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Fits a survival curve to one stratum.
pub trait Estimator {
    fn fit_group(&self, group: &SurvivalGroup, options: &EstimateOptions) -> Result<StratumCurve>;
}

/// Product-limit estimator with Greenwood variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct KaplanMeier;

impl Estimator for KaplanMeier {
    fn fit_group(&self, group: &SurvivalGroup, options: &EstimateOptions) -> Result<StratumCurve> {
        if group.time.len() != group.event.len() {
            return Err(AdtteError::Estimator(format!(
                "stratum '{}' has {} times but {} event flags",
                group.label,
                group.time.len(),
                group.event.len()
            )));
        }
        if group.time.iter().any(|t| !t.is_finite()) {
            return Err(AdtteError::Estimator(format!(
                "stratum '{}' contains non-finite times",
                group.label
            )));
        }
        options.validate()?;

        let mut order: Vec<usize> = (0..group.len()).collect();
        order.sort_by(|&a, &b| group.time[a].total_cmp(&group.time[b]));

        let mut curve = StratumCurve::default();
        let mut remaining = group.len();
        let mut surv = 1.0;
        let mut cumhaz = 0.0;
        let mut greenwood = 0.0;

        let mut i = 0;
        while i < order.len() {
            let t = group.time[order[i]];
            let mut events = 0usize;
            let mut censored = 0usize;
            while i < order.len() && group.time[order[i]] == t {
                if group.event[order[i]] {
                    events += 1;
                } else {
                    censored += 1;
                }
                i += 1;
            }

            let n = remaining as f64;
            let d = events as f64;
            if events > 0 {
                surv *= 1.0 - d / n;
                cumhaz += d / n;
                greenwood = if remaining > events {
                    greenwood + d / (n * (n - d))
                } else {
                    f64::INFINITY
                };
            }

            curve.time.push(t);
            curve.n_risk.push(remaining);
            curve.n_event.push(events);
            curve.n_censor.push(censored);
            curve.surv.push(surv);
            curve.std_err.push(greenwood.sqrt());
            curve.cumhaz.push(cumhaz);
            remaining -= events + censored;
        }

        if options.conf_type != ConfType::None {
            let z = z_critical(options.conf_int);
            let (lower, upper): (Vec<f64>, Vec<f64>) = curve
                .surv
                .iter()
                .zip(&curve.std_err)
                .map(|(&s, &se)| confidence_bounds(s, se, z, options.conf_type))
                .unzip();
            curve.lower = Some(lower);
            curve.upper = Some(upper);
        }

        Ok(curve)
    }
}

/// Pointwise bounds for a survival estimate `s` whose cumulative hazard has
/// standard error `se`. Undefined bounds are NaN.
pub fn confidence_bounds(s: f64, se: f64, z: f64, conf_type: ConfType) -> (f64, f64) {
    if s <= 0.0 || !se.is_finite() {
        return (f64::NAN, f64::NAN);
    }
    match conf_type {
        ConfType::Log => {
            let log_s = s.ln();
            ((log_s - z * se).exp(), (log_s + z * se).exp().min(1.0))
        }
        ConfType::LogLog => {
            if s >= 1.0 {
                return (1.0, 1.0);
            }
            let theta = (-s.ln()).ln();
            let spread = z * se / s.ln().abs();
            (
                (-(theta + spread).exp()).exp(),
                (-(theta - spread).exp()).exp(),
            )
        }
        ConfType::Plain => {
            let half = z * se * s;
            ((s - half).max(0.0), (s + half).min(1.0))
        }
        ConfType::None => (f64::NAN, f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(time: &[f64], event: &[bool]) -> SurvivalGroup {
        SurvivalGroup {
            label: "Overall".to_string(),
            time: time.to_vec(),
            event: event.to_vec(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn km_no_censoring() {
        let g = group(&[1.0, 2.0, 3.0, 4.0], &[true; 4]);
        let curve = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap();
        assert_eq!(curve.time, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(curve.n_risk, vec![4, 3, 2, 1]);
        assert!(close(curve.surv[0], 0.75));
        assert!(close(curve.surv[1], 0.5));
        assert!(close(curve.surv[2], 0.25));
        assert_eq!(curve.surv[3], 0.0);
        assert!(curve.std_err[3].is_infinite());
    }

    #[test]
    fn km_with_censoring_keeps_censor_rows() {
        let g = group(&[1.0, 2.0, 3.0, 4.0], &[true, false, true, false]);
        let curve = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap();
        assert_eq!(curve.n_event, vec![1, 0, 1, 0]);
        assert_eq!(curve.n_censor, vec![0, 1, 0, 1]);
        // 3/4 then 3/4 * 1/2
        assert!(close(curve.surv[1], 0.75));
        assert!(close(curve.surv[2], 0.375));
        assert!(close(curve.cumhaz[2], 0.25 + 0.5));
    }

    #[test]
    fn km_tied_times() {
        let g = group(&[2.0, 2.0, 2.0, 5.0], &[true, true, false, true]);
        let curve = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap();
        assert_eq!(curve.time, vec![2.0, 5.0]);
        assert_eq!(curve.n_event, vec![2, 1]);
        assert_eq!(curve.n_censor, vec![1, 0]);
        assert!(close(curve.surv[0], 0.5));
        assert_eq!(curve.n_risk, vec![4, 1]);
    }

    #[test]
    fn greenwood_standard_error() {
        let g = group(&[1.0, 2.0, 3.0, 4.0], &[true; 4]);
        let curve = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap();
        // d / (n (n - d)) = 1 / (4 * 3)
        assert!(close(curve.std_err[0], (1.0f64 / 12.0).sqrt()));
        assert!(close(curve.std_err[1], (1.0f64 / 12.0 + 1.0 / 6.0).sqrt()));
    }

    #[test]
    fn log_bounds_capped_at_one() {
        let g = group(&[1.0, 2.0, 3.0, 4.0, 5.0], &[true, false, false, false, false]);
        let curve = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap();
        let lower = curve.lower.unwrap();
        let upper = curve.upper.unwrap();
        assert!(lower[0] < curve.surv[0]);
        assert_eq!(upper[0], 1.0);
    }

    #[test]
    fn bounds_are_nan_when_survival_reaches_zero() {
        let g = group(&[1.0, 2.0], &[true, true]);
        let curve = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap();
        assert!(curve.lower.as_ref().unwrap()[1].is_nan());
        assert!(curve.upper.as_ref().unwrap()[1].is_nan());
    }

    #[test]
    fn conf_type_none_skips_bounds() {
        let g = group(&[1.0, 2.0], &[true, false]);
        let options = EstimateOptions::new().with_conf_type(ConfType::None);
        let curve = KaplanMeier.fit_group(&g, &options).unwrap();
        assert!(curve.lower.is_none());
        assert!(curve.upper.is_none());
    }

    #[test]
    fn bounds_bracket_the_estimate() {
        for conf_type in [ConfType::Log, ConfType::LogLog, ConfType::Plain] {
            let (lo, hi) = confidence_bounds(0.6, 0.2, 1.96, conf_type);
            assert!(lo < 0.6 && 0.6 < hi, "{conf_type}: ({lo}, {hi})");
            assert!(lo >= 0.0 && hi <= 1.0, "{conf_type}: ({lo}, {hi})");
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let g = group(&[1.0, 2.0], &[true]);
        let err = KaplanMeier.fit_group(&g, &EstimateOptions::default()).unwrap_err();
        assert!(matches!(err, AdtteError::Estimator(_)));
    }
}
