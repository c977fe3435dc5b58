//! Legend placement.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdtteError, Result};

/// Validated legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
    /// Legend hidden.
    None,
    /// Inside the panel at relative coordinates (0..1 on both axes).
    Inside { x: f64, y: f64 },
}

impl LegendPosition {
    /// Builds an inside placement from a numeric position.
    ///
    /// Exactly two elements are required.
    pub fn from_coords(coords: &[f64]) -> Result<Self> {
        match coords {
            [x, y] => Ok(LegendPosition::Inside { x: *x, y: *y }),
            other => Err(AdtteError::InvalidLegendCoordinates(other.len())),
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, LegendPosition::None)
    }
}

impl FromStr for LegendPosition {
    type Err = AdtteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(LegendPosition::Top),
            "bottom" => Ok(LegendPosition::Bottom),
            "left" => Ok(LegendPosition::Left),
            "right" => Ok(LegendPosition::Right),
            "none" => Ok(LegendPosition::None),
            other => Err(AdtteError::InvalidLegendPosition(other.to_string())),
        }
    }
}

/// Legend placement as requested by the caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LegendSpec {
    Name(String),
    Coords(Vec<f64>),
}

impl Default for LegendSpec {
    fn default() -> Self {
        LegendSpec::Name("right".to_string())
    }
}

impl LegendSpec {
    pub fn resolve(&self) -> Result<LegendPosition> {
        match self {
            LegendSpec::Name(name) => name.parse(),
            LegendSpec::Coords(coords) => LegendPosition::from_coords(coords),
        }
    }
}

impl From<&str> for LegendSpec {
    fn from(name: &str) -> Self {
        LegendSpec::Name(name.to_string())
    }
}

impl From<Vec<f64>> for LegendSpec {
    fn from(coords: Vec<f64>) -> Self {
        LegendSpec::Coords(coords)
    }
}

impl From<(f64, f64)> for LegendSpec {
    fn from((x, y): (f64, f64)) -> Self {
        LegendSpec::Coords(vec![x, y])
    }
}

impl From<LegendPosition> for LegendSpec {
    fn from(position: LegendPosition) -> Self {
        match position {
            LegendPosition::Top => "top".into(),
            LegendPosition::Bottom => "bottom".into(),
            LegendPosition::Left => "left".into(),
            LegendPosition::Right => "right".into(),
            LegendPosition::None => "none".into(),
            LegendPosition::Inside { x, y } => (x, y).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_positions() {
        for name in ["top", "bottom", "left", "right", "none"] {
            assert!(LegendSpec::from(name).resolve().is_ok(), "{name}");
        }
        assert!(LegendSpec::from("none").resolve().unwrap().is_hidden());
    }

    #[test]
    fn center_is_rejected() {
        let err = LegendSpec::from("center").resolve().unwrap_err();
        assert!(matches!(err, AdtteError::InvalidLegendPosition(ref name) if name == "center"));
    }

    #[test]
    fn two_coordinates_are_accepted() {
        let position = LegendSpec::from((0.5, 0.5)).resolve().unwrap();
        assert_eq!(position, LegendPosition::Inside { x: 0.5, y: 0.5 });
    }

    #[test]
    fn three_coordinates_are_rejected() {
        let err = LegendSpec::from(vec![0.1, 0.2, 0.3]).resolve().unwrap_err();
        assert!(matches!(err, AdtteError::InvalidLegendCoordinates(3)));
    }

    #[test]
    fn position_round_trips_through_legend_spec() {
        let position = LegendPosition::Inside { x: 0.8, y: 0.2 };
        assert_eq!(LegendSpec::from(position).resolve().unwrap(), position);
    }
}
