//! Configuration options for estimation and plotting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdtteError, Result};
use crate::legend::LegendSpec;
use crate::transform::{CurveFun, Transform};

/// Scale on which pointwise confidence intervals are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfType {
    /// Symmetric on the log-survival scale; upper bound capped at 1.
    #[default]
    Log,
    /// Symmetric on the log(-log(survival)) scale.
    LogLog,
    /// Symmetric on the survival scale, clipped to [0, 1].
    Plain,
    /// No confidence interval.
    None,
}

impl ConfType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfType::Log => "log",
            ConfType::LogLog => "log-log",
            ConfType::Plain => "plain",
            ConfType::None => "none",
        }
    }
}

impl fmt::Display for ConfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfType {
    type Err = AdtteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(ConfType::Log),
            "log-log" | "loglog" => Ok(ConfType::LogLog),
            "plain" => Ok(ConfType::Plain),
            "none" => Ok(ConfType::None),
            other => Err(AdtteError::invalid_option(
                "conf_type",
                format!("'{other}' is not one of log, log-log, plain, none"),
            )),
        }
    }
}

/// Options handed verbatim to the survival estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateOptions {
    /// Confidence level of the pointwise intervals, in (0, 1).
    pub conf_int: f64,
    /// Scale used to build the intervals.
    pub conf_type: ConfType,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            conf_int: 0.95,
            conf_type: ConfType::default(),
        }
    }
}

impl EstimateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_conf_int(mut self, level: f64) -> Self {
        self.conf_int = level;
        self
    }

    #[must_use]
    pub fn with_conf_type(mut self, conf_type: ConfType) -> Self {
        self.conf_type = conf_type;
        self
    }

    /// Checks that the confidence level lies strictly between 0 and 1.
    pub fn validate(&self) -> Result<()> {
        if self.conf_int > 0.0 && self.conf_int < 1.0 {
            Ok(())
        } else {
            Err(AdtteError::invalid_option(
                "conf_int",
                format!("{} is not strictly between 0 and 1", self.conf_int),
            ))
        }
    }
}

/// Display options for a survival plot.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Transform applied to the survival estimate.
    pub fun: CurveFun,
    /// X-axis label; defaults to the PARAM metadata or "time".
    pub x_label: Option<String>,
    /// Y-axis label; required when `fun` is a custom function.
    pub y_label: Option<String>,
    /// Unit appended to the x-axis label in parentheses.
    pub x_units: Option<String>,
    /// Explicit x-axis breaks.
    pub x_ticks: Option<Vec<f64>>,
    /// Explicit y-axis breaks.
    pub y_ticks: Option<Vec<f64>>,
    /// Requested legend placement, validated when the plot is built.
    pub legend_position: LegendSpec,
    /// Draw confidence ribbons when the fit carries bounds.
    pub show_ci: bool,
    /// Mark censoring times on each curve.
    pub show_censor: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            fun: CurveFun::Transform(Transform::Surv),
            x_label: None,
            y_label: None,
            x_units: None,
            x_ticks: None,
            y_ticks: None,
            legend_position: LegendSpec::default(),
            show_ci: true,
            show_censor: false,
        }
    }
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fun(mut self, fun: impl Into<CurveFun>) -> Self {
        self.fun = fun.into();
        self
    }

    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_x_units(mut self, units: impl Into<String>) -> Self {
        self.x_units = Some(units.into());
        self
    }

    #[must_use]
    pub fn with_x_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.x_ticks = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_y_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.y_ticks = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: impl Into<LegendSpec>) -> Self {
        self.legend_position = legend.into();
        self
    }

    #[must_use]
    pub fn with_ci(mut self, show: bool) -> Self {
        self.show_ci = show;
        self
    }

    #[must_use]
    pub fn with_censor_marks(mut self, show: bool) -> Self {
        self.show_censor = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conf_type_parses_aliases() {
        assert_eq!("log".parse::<ConfType>().unwrap(), ConfType::Log);
        assert_eq!("LogLog".parse::<ConfType>().unwrap(), ConfType::LogLog);
        assert_eq!("log-log".parse::<ConfType>().unwrap(), ConfType::LogLog);
        assert!("arcsin".parse::<ConfType>().is_err());
    }

    #[test]
    fn estimate_options_reject_out_of_range_level() {
        assert!(EstimateOptions::default().validate().is_ok());
        assert!(EstimateOptions::new().with_conf_int(1.0).validate().is_err());
        assert!(EstimateOptions::new().with_conf_int(0.0).validate().is_err());
    }

    #[test]
    fn estimate_options_serialize_kebab_case() {
        let options = EstimateOptions::new().with_conf_type(ConfType::LogLog);
        let json = serde_json::to_string(&options).expect("serialize options");
        assert_eq!(json, r#"{"conf_int":0.95,"conf_type":"log-log"}"#);
    }

    #[test]
    fn plot_options_default_to_survival_scale() {
        let options = PlotOptions::default();
        assert!(matches!(options.fun, CurveFun::Transform(Transform::Surv)));
        assert!(options.show_ci);
        assert!(!options.show_censor);
    }
}
