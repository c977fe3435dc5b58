//! Error types shared by the estimation and plotting crates.

use thiserror::Error;

/// Broad category of an [`AdtteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input table does not have the expected shape.
    InputShape,
    /// An argument is outside its accepted domain.
    ArgumentDomain,
    /// A collaborator (polars, estimator) failed.
    Internal,
}

/// Errors raised while estimating or plotting survival curves.
#[derive(Debug, Error)]
pub enum AdtteError {
    // === Input shape ===
    /// One or more required columns are absent from the table.
    #[error("missing required column(s) in data: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A column that must hold numbers has another dtype.
    #[error("column '{column}' must be numeric, found {dtype}")]
    NonNumericColumn { column: String, dtype: String },

    /// Every row was dropped while removing missing values.
    #[error("no complete rows remain after dropping missing values in {}", .columns.join(", "))]
    NoRows { columns: Vec<String> },

    /// Event times must not precede the time origin.
    #[error("column '{column}' has {count} negative time value(s)")]
    NegativeTime { column: String, count: usize },

    // === Argument domain ===
    /// The transform name is not part of the transform table.
    #[error(
        "unrecognized transform '{0}'; expected one of surv, log, event, cloglog, pct, logpct, cumhaz"
    )]
    UnknownTransform(String),

    /// A custom transform was given without a y-axis label.
    #[error("no y-axis label given; no default is available when a custom transform is supplied")]
    MissingYLabel,

    /// Legend position string is not one of the supported placements.
    #[error("unsupported legend position '{0}'; expected top, bottom, left, right or none")]
    InvalidLegendPosition(String),

    /// Numeric legend position without exactly two coordinates.
    #[error("numeric legend position needs exactly two elements, got {0}")]
    InvalidLegendCoordinates(usize),

    /// The object handed to the plotter is not a survival fit.
    #[error("cannot plot an object of kind '{kind}'; expected a survival fit")]
    UnsupportedObject { kind: String },

    /// An option value is out of range.
    #[error("invalid value for {name}: {message}")]
    InvalidOption { name: &'static str, message: String },

    // === Collaborators ===
    /// The survival estimator rejected its input.
    #[error("survival estimator failed: {0}")]
    Estimator(String),

    /// A polars operation failed.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl AdtteError {
    /// Returns the category used to decide how the error is reported.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumns { .. }
            | Self::NonNumericColumn { .. }
            | Self::NoRows { .. }
            | Self::NegativeTime { .. } => ErrorKind::InputShape,
            Self::UnknownTransform(_)
            | Self::MissingYLabel
            | Self::InvalidLegendPosition(_)
            | Self::InvalidLegendCoordinates(_)
            | Self::UnsupportedObject { .. }
            | Self::InvalidOption { .. } => ErrorKind::ArgumentDomain,
            Self::Estimator(_) | Self::DataFrame { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_option(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for AdtteError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for survival operations.
pub type Result<T> = std::result::Result<T, AdtteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_names_every_column() {
        let err = AdtteError::MissingColumns {
            columns: vec!["CNSR".to_string(), "TRT01P".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required column(s) in data: CNSR, TRT01P"
        );
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }

    #[test]
    fn negative_time_is_an_input_error() {
        let err = AdtteError::NegativeTime {
            column: "AVAL".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "column 'AVAL' has 2 negative time value(s)");
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }

    #[test]
    fn argument_errors_are_classified() {
        assert_eq!(AdtteError::MissingYLabel.kind(), ErrorKind::ArgumentDomain);
        assert_eq!(
            AdtteError::UnknownTransform("logit".into()).kind(),
            ErrorKind::ArgumentDomain
        );
    }

    #[test]
    fn polars_errors_convert() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("AVAL".into());
        let err: AdtteError = polars_err.into();
        assert!(matches!(err, AdtteError::DataFrame { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
