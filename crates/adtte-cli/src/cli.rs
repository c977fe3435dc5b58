//! CLI argument definitions for the ADTTE survival tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use adtte_model::ConfType;

#[derive(Parser)]
#[command(
    name = "adtte",
    version,
    about = "Kaplan-Meier estimation and plots for ADaM time-to-event data",
    long_about = "Fit Kaplan-Meier curves to an ADaM BDS time-to-event dataset (ADTTE).\n\n\
                  Reads AVAL and CNSR from a CSV file, optionally stratifies, prints\n\
                  per-stratum medians and numbers at risk, and writes an SVG plot."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Prefix log lines with a timestamp (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fit Kaplan-Meier curves and optionally plot them.
    Km(KmArgs),

    /// List the available curve transforms.
    Transforms,
}

#[derive(Parser)]
pub struct KmArgs {
    /// ADTTE dataset in CSV format.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Stratification columns, comma separated.
    #[arg(long = "strata", value_delimiter = ',', value_name = "COLUMNS")]
    pub strata: Vec<String>,

    /// Curve transform (surv, log, event, cloglog, pct, logpct, cumhaz).
    #[arg(long = "fun", default_value = "surv")]
    pub fun: String,

    /// Confidence level of the pointwise intervals.
    #[arg(long = "conf-int", default_value_t = 0.95)]
    pub conf_int: f64,

    /// Scale on which confidence intervals are built.
    #[arg(long = "conf-type", value_enum, default_value = "log")]
    pub conf_type: ConfTypeArg,

    /// Time unit appended to the x-axis label.
    #[arg(long = "x-units", value_name = "UNIT")]
    pub x_units: Option<String>,

    /// Legend placement: top, bottom, left, right, none, or "X,Y" inside the panel.
    #[arg(long = "legend", default_value = "right")]
    pub legend: String,

    /// Do not draw confidence ribbons.
    #[arg(long = "no-ci")]
    pub no_ci: bool,

    /// Mark censoring times on the curves.
    #[arg(long = "censor")]
    pub censor: bool,

    /// Write the plot as SVG to this file.
    #[arg(long = "output", short = 'o', value_name = "FILE.svg")]
    pub output: Option<PathBuf>,

    /// Plot width in pixels.
    #[arg(long = "width", default_value_t = 800)]
    pub width: u32,

    /// Plot height in pixels.
    #[arg(long = "height", default_value_t = 500)]
    pub height: u32,
}

/// CLI confidence interval scale choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfTypeArg {
    Log,
    LogLog,
    Plain,
    None,
}

impl From<ConfTypeArg> for ConfType {
    fn from(arg: ConfTypeArg) -> Self {
        match arg {
            ConfTypeArg::Log => ConfType::Log,
            ConfTypeArg::LogLog => ConfType::LogLog,
            ConfTypeArg::Plain => ConfType::Plain,
            ConfTypeArg::None => ConfType::None,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
