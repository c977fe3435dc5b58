//! Tests for the Kaplan-Meier estimator wrapper.

use adtte_estimate::{
    Estimator, KaplanMeier, StratumCurve, SurvivalGroup, estimate_km, estimate_km_with,
    risk_table, summarize, tidy,
};
use adtte_model::{AdtteError, ConfType, EstimateOptions, ErrorKind, OVERALL};
use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;

fn adtte() -> DataFrame {
    DataFrame::new(vec![
        Column::new("USUBJID".into(), &["S1", "S2", "S3", "S4", "S5", "S6"]),
        Column::new(
            "PARAM".into(),
            &["Time to Death"; 6],
        ),
        Column::new("PARAMCD".into(), &["TTDEATH"; 6]),
        Column::new("TRT".into(), &["A", "A", "A", "B", "B", "B"]),
        Column::new("AVAL".into(), &[1.0, 2.0, 3.0, 2.0, 4.0, 5.0]),
        Column::new("CNSR".into(), &[0i64, 1, 0, 0, 0, 1]),
    ])
    .unwrap()
}

fn describe(fit: &adtte_model::SurvivalFit) -> String {
    fit.rows()
        .map(|r| {
            format!(
                "{} t={} risk={} event={} censor={} surv={:.4}",
                r.stratum, r.time, r.n_risk, r.n_event, r.n_censor, r.surv
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn stratified_fit_rows() {
    let fit = estimate_km(&adtte(), &["TRT"], &EstimateOptions::default()).unwrap();
    insta::assert_snapshot!(describe(&fit), @r"
    TRT=A t=0 risk=3 event=0 censor=0 surv=1.0000
    TRT=A t=1 risk=3 event=1 censor=0 surv=0.6667
    TRT=A t=2 risk=2 event=0 censor=1 surv=0.6667
    TRT=A t=3 risk=1 event=1 censor=0 surv=0.0000
    TRT=B t=0 risk=3 event=0 censor=0 surv=1.0000
    TRT=B t=2 risk=3 event=1 censor=0 surv=0.6667
    TRT=B t=4 risk=2 event=1 censor=0 surv=0.3333
    TRT=B t=5 risk=1 event=0 censor=1 surv=0.3333
    ");
    assert_eq!(fit.n, vec![3, 3]);
    assert_eq!(fit.call.formula, "Surv(AVAL, 1 - CNSR) ~ TRT");
    assert_eq!(fit.call.strata, vec!["TRT".to_string()]);
}

#[test]
fn every_stratum_starts_at_time_zero() {
    let fit = estimate_km(&adtte(), &["TRT"], &EstimateOptions::default()).unwrap();
    for (_, range) in fit.stratum_ranges() {
        assert_eq!(fit.time[range.start], 0.0);
        assert_eq!(fit.surv[range.start], 1.0);
        assert_eq!(fit.cumhaz[range.start], 0.0);
    }
    let lower = fit.lower.as_ref().unwrap();
    assert_eq!(lower[0], 1.0);
}

#[test]
fn time_zero_row_is_added_when_observation_at_zero() {
    let df = DataFrame::new(vec![
        Column::new("AVAL".into(), &[0.0, 3.0, 6.0]),
        Column::new("CNSR".into(), &[0i64, 0, 1]),
    ])
    .unwrap();
    let fit = estimate_km(&df, &[], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.time, vec![0.0, 0.0, 3.0, 6.0]);
    assert_eq!(fit.surv[0], 1.0);
}

#[test]
fn unstratified_fit_is_overall() {
    let fit = estimate_km(&adtte(), &[], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.strata_labels(), vec![OVERALL]);
    assert_eq!(fit.call.formula, "Surv(AVAL, 1 - CNSR) ~ 1");
    assert_eq!(fit.n, vec![6]);
}

#[test]
fn negative_times_are_rejected() {
    let df = DataFrame::new(vec![
        Column::new("AVAL".into(), &[-2.0, 1.0, 3.0]),
        Column::new("CNSR".into(), &[0i64, 0, 1]),
    ])
    .unwrap();
    let err = estimate_km(&df, &[], &EstimateOptions::default()).unwrap_err();
    assert!(matches!(err, AdtteError::NegativeTime { ref column, count: 1 } if column == "AVAL"));
    assert_eq!(err.kind(), ErrorKind::InputShape);
}

#[test]
fn negative_time_in_dropped_row_is_ignored() {
    let df = DataFrame::new(vec![
        Column::new("AVAL".into(), &[-2.0, 1.0, 3.0]),
        Column::new("CNSR".into(), &[None, Some(0i64), Some(1)]),
    ])
    .unwrap();
    let fit = estimate_km(&df, &[], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.time, vec![0.0, 1.0, 3.0]);
}

#[test]
fn single_level_stratum_keeps_variable_prefix() {
    let df = DataFrame::new(vec![
        Column::new("TRT".into(), &["A", "A", "A"]),
        Column::new("AVAL".into(), &[1.0, 2.0, 3.0]),
        Column::new("CNSR".into(), &[0i64, 1, 0]),
    ])
    .unwrap();
    let fit = estimate_km(&df, &["TRT"], &EstimateOptions::default()).unwrap();
    // the sole observed level is reported as `VAR=level`, like multi-level strata
    assert_eq!(fit.strata_labels(), vec!["TRT=A"]);
    assert_ne!(fit.strata_labels(), vec![OVERALL]);
}

#[test]
fn two_variables_join_labels() {
    let mut df = adtte();
    df.with_column(Column::new("SEX".into(), &["F", "M", "F", "F", "M", "M"]))
        .unwrap();
    let fit = estimate_km(&df, &["TRT", "SEX"], &EstimateOptions::default()).unwrap();
    assert_eq!(
        fit.strata_labels(),
        vec!["TRT=A, SEX=F", "TRT=A, SEX=M", "TRT=B, SEX=F", "TRT=B, SEX=M"]
    );
    assert_eq!(fit.call.formula, "Surv(AVAL, 1 - CNSR) ~ TRT + SEX");
}

#[test]
fn missing_columns_are_named() {
    let df = adtte().drop("CNSR").unwrap();
    let err = estimate_km(&df, &["ARM"], &EstimateOptions::default()).unwrap_err();
    match &err {
        AdtteError::MissingColumns { columns } => {
            assert_eq!(columns, &vec!["ARM".to_string(), "CNSR".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::InputShape);
    assert!(err.to_string().contains("CNSR"));
}

#[test]
fn non_numeric_time_is_rejected() {
    let df = DataFrame::new(vec![
        Column::new("AVAL".into(), &["1", "2"]),
        Column::new("CNSR".into(), &[0i64, 1]),
    ])
    .unwrap();
    let err = estimate_km(&df, &[], &EstimateOptions::default()).unwrap_err();
    assert!(matches!(err, AdtteError::NonNumericColumn { ref column, .. } if column == "AVAL"));
}

#[test]
fn incomplete_rows_are_dropped() {
    let df = DataFrame::new(vec![
        Column::new("TRT".into(), &[Some("A"), Some("A"), None, Some("A")]),
        Column::new("AVAL".into(), &[Some(1.0), None, Some(2.0), Some(4.0)]),
        Column::new("CNSR".into(), &[Some(0i64), Some(0), Some(0), None]),
    ])
    .unwrap();
    let fit = estimate_km(&df, &["TRT"], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.n, vec![1]);
    assert_eq!(fit.time, vec![0.0, 1.0]);
}

#[test]
fn no_complete_rows_is_an_error() {
    let df = DataFrame::new(vec![
        Column::new("AVAL".into(), &[None::<f64>, None]),
        Column::new("CNSR".into(), &[Some(0i64), Some(1)]),
    ])
    .unwrap();
    let err = estimate_km(&df, &[], &EstimateOptions::default()).unwrap_err();
    assert!(matches!(err, AdtteError::NoRows { .. }));
}

#[test]
fn single_valued_param_is_attached() {
    let fit = estimate_km(&adtte(), &["TRT"], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.param_label(), Some("Time to Death"));
    assert_eq!(
        fit.param.as_ref().and_then(|p| p.paramcd.as_deref()),
        Some("TTDEATH")
    );
}

#[test]
fn param_used_as_stratum_is_not_attached() {
    let fit = estimate_km(&adtte(), &["PARAMCD"], &EstimateOptions::default()).unwrap();
    let param = fit.param.unwrap();
    assert_eq!(param.param.as_deref(), Some("Time to Death"));
    assert_eq!(param.paramcd, None);
}

#[test]
fn multi_valued_param_is_not_attached() {
    let mut df = adtte();
    df.with_column(Column::new(
        "PARAM".into(),
        &["Death", "Death", "Death", "Progression", "Progression", "Progression"],
    ))
    .unwrap();
    let fit = estimate_km(&df, &[], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.param_label(), None);
}

#[test]
fn input_frame_is_not_mutated() {
    let df = adtte();
    let before = df.clone();
    estimate_km(&df, &["TRT"], &EstimateOptions::default()).unwrap();
    assert!(df.equals_missing(&before));
}

#[test]
fn conf_type_none_has_no_bounds() {
    let options = EstimateOptions::new().with_conf_type(ConfType::None);
    let fit = estimate_km(&adtte(), &[], &options).unwrap();
    assert!(!fit.has_conf_bounds());
    assert!(fit.conf.is_none());
}

#[test]
fn invalid_conf_level_is_rejected() {
    let options = EstimateOptions::new().with_conf_int(1.5);
    let err = estimate_km(&adtte(), &[], &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentDomain);
}

struct Flat;

impl Estimator for Flat {
    fn fit_group(
        &self,
        group: &SurvivalGroup,
        _options: &EstimateOptions,
    ) -> adtte_model::Result<StratumCurve> {
        Ok(StratumCurve {
            time: vec![10.0],
            n_risk: vec![group.len()],
            n_event: vec![0],
            n_censor: vec![group.len()],
            surv: vec![1.0],
            std_err: vec![0.0],
            cumhaz: vec![0.0],
            lower: None,
            upper: None,
        })
    }
}

#[test]
fn custom_estimator_is_post_processed() {
    let fit = estimate_km_with(&Flat, &adtte(), &["TRT"], &EstimateOptions::default()).unwrap();
    assert_eq!(fit.time, vec![0.0, 10.0, 0.0, 10.0]);
    assert!(!fit.has_conf_bounds());
}

#[test]
fn tables_from_fit() {
    let fit = estimate_km(&adtte(), &["TRT"], &EstimateOptions::default()).unwrap();

    let df = tidy(&fit).unwrap();
    assert_eq!(df.height(), fit.len());

    let summary = summarize(&fit);
    assert_eq!(summary[0].events, 2);
    assert_eq!(summary[0].median, Some(3.0));
    assert_eq!(summary[1].median, Some(4.0));

    let risk: Vec<usize> = risk_table(&fit, &[0.0, 2.5])
        .into_iter()
        .map(|r| r.n_risk)
        .collect();
    assert_eq!(risk, vec![3, 1, 3, 2]);
}

proptest! {
    #[test]
    fn estimate_is_monotone_and_bounded(
        obs in prop::collection::vec((0u32..50, any::<bool>()), 1..40)
    ) {
        let time: Vec<f64> = obs.iter().map(|(t, _)| f64::from(*t)).collect();
        let cnsr: Vec<i64> = obs.iter().map(|(_, e)| i64::from(!*e)).collect();
        let df = DataFrame::new(vec![
            Column::new("AVAL".into(), time),
            Column::new("CNSR".into(), cnsr),
        ])
        .unwrap();
        let fit = estimate_km(&df, &[], &EstimateOptions::default()).unwrap();
        prop_assert_eq!(fit.time[0], 0.0);
        prop_assert_eq!(fit.n_risk[0], obs.len());
        for pair in fit.surv.windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
        prop_assert!(fit.surv.iter().all(|s| (0.0..=1.0).contains(s)));
        let group = SurvivalGroup {
            label: OVERALL.to_string(),
            time: obs.iter().map(|(t, _)| f64::from(*t)).collect(),
            event: obs.iter().map(|(_, e)| *e).collect(),
        };
        let curve = KaplanMeier.fit_group(&group, &EstimateOptions::default()).unwrap();
        prop_assert_eq!(curve.len() + 1, fit.len());
    }
}
