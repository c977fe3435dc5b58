//! Fitted objects accepted by the plot dispatcher.

use crate::fit::SurvivalFit;

/// A fitted model handed to the plotting layer.
///
/// Only survival fits can be drawn; other kinds are carried so the
/// dispatcher can reject them with a descriptive error.
#[derive(Debug, Clone)]
pub enum FittedObject {
    Survival(SurvivalFit),
    Unsupported { kind: String },
}

impl FittedObject {
    pub fn kind(&self) -> &str {
        match self {
            FittedObject::Survival(_) => "survfit",
            FittedObject::Unsupported { kind } => kind,
        }
    }

    pub fn as_survival(&self) -> Option<&SurvivalFit> {
        match self {
            FittedObject::Survival(fit) => Some(fit),
            FittedObject::Unsupported { .. } => None,
        }
    }
}

impl From<SurvivalFit> for FittedObject {
    fn from(fit: SurvivalFit) -> Self {
        FittedObject::Survival(fit)
    }
}
