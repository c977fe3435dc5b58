//! Declarative chart description handed to a rendering backend.

use serde::{Deserialize, Serialize};

use crate::legend::LegendPosition;

/// Class markers carried by a chart.
///
/// A survival chart keeps the base [`ChartClass::Chart`] marker so consumers
/// that only understand plain charts still accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartClass {
    SurvivalCurve,
    Chart,
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Fixed categorical palette assigned to strata in order.
pub const PALETTE: [Rgb; 8] = [
    Rgb(0xE6, 0x9F, 0x00),
    Rgb(0x56, 0xB4, 0xE9),
    Rgb(0x00, 0x9E, 0x73),
    Rgb(0xD5, 0x5E, 0x00),
    Rgb(0x00, 0x72, 0xB2),
    Rgb(0xCC, 0x79, 0xA7),
    Rgb(0xF0, 0xE4, 0x42),
    Rgb(0x00, 0x00, 0x00),
];

/// Color for the stratum at `index`, cycling through [`PALETTE`].
pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Axis title, breaks and visible range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub label: String,
    pub breaks: Vec<f64>,
    pub limits: (f64, f64),
}

/// Confidence band at one x position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonPoint {
    pub x: f64,
    pub lower: f64,
    pub upper: f64,
}

/// One stratum drawn as a right-continuous step function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveLayer {
    pub label: String,
    pub color: Rgb,
    /// Step corners; the curve holds each y until the next x.
    pub points: Vec<(f64, f64)>,
    pub ribbon: Option<Vec<RibbonPoint>>,
    pub censor_marks: Vec<(f64, f64)>,
}

/// Base theme settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub base_size: u32,
    pub background: Rgb,
    pub grid: bool,
    /// Opacity of confidence ribbons.
    pub ribbon_alpha: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            base_size: 11,
            background: Rgb(0xFF, 0xFF, 0xFF),
            grid: true,
            ribbon_alpha: 0.25,
        }
    }
}

/// Everything a backend needs to draw a survival chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub classes: Vec<ChartClass>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub curves: Vec<CurveLayer>,
    pub legend: LegendPosition,
    pub legend_title: String,
    pub theme: Theme,
}

impl ChartSpec {
    pub fn has_class(&self, class: ChartClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn is_survival_curve(&self) -> bool {
        self.has_class(ChartClass::SurvivalCurve)
    }
}
