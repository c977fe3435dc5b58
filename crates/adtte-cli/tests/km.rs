//! End-to-end tests for the `km` command.

use std::fs;
use std::path::Path;

use clap::Parser;

use adtte_cli::cli::{Cli, Command, ConfTypeArg, KmArgs};
use adtte_cli::commands::run_km;
use adtte_cli::logging::{LogConfig, LogFormat};
use adtte_cli::summary::median_table;

const ADTTE: &str = "\
USUBJID,PARAM,PARAMCD,TRT,AVAL,CNSR
S1,Time to Death,TTDEATH,A,1,0
S2,Time to Death,TTDEATH,A,2,1
S3,Time to Death,TTDEATH,A,3,0
S4,Time to Death,TTDEATH,B,2,0
S5,Time to Death,TTDEATH,B,4,0
S6,Time to Death,TTDEATH,B,5,1
";

fn write_csv(dir: &Path) -> String {
    let path = dir.join("adtte.csv");
    fs::write(&path, ADTTE).unwrap();
    path.display().to_string()
}

fn km_args(argv: &[&str]) -> KmArgs {
    let cli = Cli::try_parse_from(argv).unwrap();
    match cli.command {
        Command::Km(args) => args,
        Command::Transforms => panic!("expected km"),
    }
}

#[test]
fn km_defaults() {
    let args = km_args(&["adtte", "km", "adtte.csv"]);
    assert!(args.strata.is_empty());
    assert_eq!(args.fun, "surv");
    assert_eq!(args.conf_int, 0.95);
    assert_eq!(args.conf_type, ConfTypeArg::Log);
    assert_eq!(args.legend, "right");
    assert!(!args.no_ci);
    assert!(args.output.is_none());
}

#[test]
fn km_writes_svg_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path());
    let svg = dir.path().join("km.svg");
    let svg_arg = svg.display().to_string();
    let args = km_args(&[
        "adtte", "km", &csv, "--strata", "TRT", "--censor", "--x-units", "days", "--output",
        &svg_arg,
    ]);

    let result = run_km(&args).unwrap();
    assert_eq!(result.formula, "Surv(AVAL, 1 - CNSR) ~ TRT");
    assert_eq!(result.param.as_deref(), Some("Time to Death"));
    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.summary[0].median, Some(3.0));
    assert_eq!(result.plot.chart.x_axis.label, "Time to Death (days)");
    let breaks = result.plot.chart.x_axis.breaks.len();
    assert_eq!(result.risk.len(), 2 * breaks);
    assert_eq!(result.risk[0].n_risk, 3);

    let content = fs::read_to_string(&svg).unwrap();
    assert!(content.starts_with("<svg"));
    assert!(content.contains("TRT=A"));
    assert!(content.contains("TRT=B"));
}

#[test]
fn km_with_multiple_strata_and_inside_legend() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path());
    let args = km_args(&[
        "adtte", "km", &csv, "--strata", "TRT,PARAMCD", "--legend", "0.8,0.9", "--no-ci",
    ]);
    let result = run_km(&args).unwrap();
    assert_eq!(result.formula, "Surv(AVAL, 1 - CNSR) ~ TRT + PARAMCD");
    assert!(result.plot.chart.curves.iter().all(|c| c.ribbon.is_none()));
    assert!(result.output.is_none());
}

#[test]
fn km_carries_conf_level_to_summary() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path());
    let args = km_args(&["adtte", "km", &csv, "--conf-int", "0.8"]);
    let result = run_km(&args).unwrap();
    let conf = result.conf.unwrap();
    assert_eq!(conf.level, 0.8);
    let table = median_table(&result.summary, result.conf.as_ref()).to_string();
    assert!(table.contains("80% CI"));

    let args = km_args(&["adtte", "km", &csv, "--conf-type", "none"]);
    let result = run_km(&args).unwrap();
    assert!(result.conf.is_none());
    let table = median_table(&result.summary, result.conf.as_ref()).to_string();
    assert!(!table.contains("% CI"));
}

#[test]
fn km_rejects_unknown_transform() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path());
    let args = km_args(&["adtte", "km", &csv, "--fun", "logit"]);
    let err = run_km(&args).unwrap_err();
    assert!(format!("{err:#}").contains("logit"));
}

#[test]
fn km_reports_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path());
    let args = km_args(&["adtte", "km", &csv, "--strata", "ARM"]);
    let err = run_km(&args).unwrap_err();
    assert!(format!("{err:#}").contains("ARM"));
}

#[test]
fn km_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.csv").display().to_string();
    let args = km_args(&["adtte", "km", &missing]);
    assert!(run_km(&args).is_err());
}

#[test]
fn global_log_flags_parse_after_subcommand() {
    let cli = Cli::try_parse_from(["adtte", "transforms", "--log-format", "json", "-v"]).unwrap();
    assert!(matches!(cli.command, Command::Transforms));
    assert!(cli.verbosity.is_present());
    assert!(!cli.log_timestamps);

    let cli = Cli::try_parse_from(["adtte", "transforms", "--log-timestamps", "--log-target"]).unwrap();
    assert!(cli.log_timestamps);
    assert!(cli.log_target);
}

#[test]
fn log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.use_env_filter);
    assert!(!config.with_timestamps);
    assert!(!config.with_target);
    assert!(config.log_file.is_none());
}
