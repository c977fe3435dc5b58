//! SVG output through the `plotters` SVG backend.

use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::combinators::{BindKeyPoints, WithKeyPoints};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::{debug, info};

use adtte_model::{ChartSpec, CurveLayer, LegendPosition, Rgb, RibbonPoint};

use crate::error::{RenderError, Result};

/// Default image size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (800, 500);

const LINE_WIDTH: u32 = 2;
const CENSOR_MARK_SIZE: u32 = 4;
const LEGEND_SAMPLE_WIDTH: i32 = 20;

/// Renders a chart to an SVG document.
pub fn render_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<String> {
    check_limits('x', spec.x_axis.limits)?;
    check_limits('y', spec.y_axis.limits)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, spec)?;
        root.present()?;
    }
    debug!(bytes = svg.len(), curves = spec.curves.len(), "rendered chart");
    Ok(svg)
}

/// Renders a chart and writes it to `path`.
pub fn save_svg(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<()> {
    let svg = render_svg(spec, size)?;
    std::fs::write(path, svg).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote survival plot");
    Ok(())
}

fn check_limits(axis: char, (lo, hi): (f64, f64)) -> Result<()> {
    if lo.is_finite() && hi.is_finite() && lo < hi {
        Ok(())
    } else {
        Err(RenderError::InvalidLimits { axis, lo, hi })
    }
}

fn draw_chart(root: &DrawingArea<SVGBackend<'_>, Shift>, spec: &ChartSpec) -> Result<()> {
    let theme = &spec.theme;
    let font = f64::from(theme.base_size);
    root.fill(&rgb(theme.background))?;

    let (x_lo, x_hi) = spec.x_axis.limits;
    let (y_lo, y_hi) = spec.y_axis.limits;
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(theme.base_size * 4)
        .y_label_area_size(theme.base_size * 5)
        .build_cartesian_2d(
            (x_lo..x_hi).with_key_points(spec.x_axis.breaks.clone()),
            (y_lo..y_hi).with_key_points(spec.y_axis.breaks.clone()),
        )?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.x_axis.label.as_str())
        .y_desc(spec.y_axis.label.as_str())
        .label_style(("sans-serif", font))
        .axis_desc_style(("sans-serif", font + 1.0))
        .x_label_formatter(&format_break)
        .y_label_formatter(&format_break);
    if !theme.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let legend = !spec.legend.is_hidden();
    if legend && !spec.legend_title.is_empty() {
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(spec.legend_title.as_str())
            .legend(|(x, y)| EmptyElement::at((x, y)));
    }

    for curve in &spec.curves {
        if let Some(ribbon) = curve.ribbon.as_deref().filter(|r| r.len() > 1) {
            let fill = rgb(curve.color).mix(theme.ribbon_alpha).filled();
            chart.draw_series(std::iter::once(Polygon::new(ribbon_outline(ribbon), fill)))?;
        }
    }

    for curve in &spec.curves {
        draw_curve(&mut chart, curve, legend)?;
    }

    let area = chart.plotting_area().dim_in_pixel();
    if let Some(position) = legend_position(&spec.legend, area) {
        chart
            .configure_series_labels()
            .position(position)
            .label_font(("sans-serif", font))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

type SurvivalChart<'a, 'b> = ChartContext<
    'a,
    SVGBackend<'b>,
    Cartesian2d<WithKeyPoints<RangedCoordf64>, WithKeyPoints<RangedCoordf64>>,
>;

fn draw_curve(chart: &mut SurvivalChart<'_, '_>, curve: &CurveLayer, legend: bool) -> Result<()> {
    let style = rgb(curve.color).stroke_width(LINE_WIDTH);
    let series = chart.draw_series(LineSeries::new(step_path(&curve.points), style))?;
    if legend {
        series
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + LEGEND_SAMPLE_WIDTH, y)], style));
    }
    if !curve.censor_marks.is_empty() {
        chart.draw_series(
            curve
                .censor_marks
                .iter()
                .map(|&point| Cross::new(point, CENSOR_MARK_SIZE, style)),
        )?;
    }
    Ok(())
}

/// Expands step corners into a right-continuous path.
pub fn step_path(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut path = Vec::with_capacity(points.len() * 2);
    for (idx, &(x, y)) in points.iter().enumerate() {
        if idx > 0 {
            let (_, prev_y) = points[idx - 1];
            path.push((x, prev_y));
        }
        path.push((x, y));
    }
    path
}

/// Closed outline of a stepped confidence band: upper edge forward, lower edge back.
pub fn ribbon_outline(ribbon: &[RibbonPoint]) -> Vec<(f64, f64)> {
    let upper: Vec<(f64, f64)> = ribbon.iter().map(|p| (p.x, p.upper)).collect();
    let lower: Vec<(f64, f64)> = ribbon.iter().map(|p| (p.x, p.lower)).collect();
    let mut outline = step_path(&upper);
    outline.extend(step_path(&lower).into_iter().rev());
    outline
}

fn legend_position(legend: &LegendPosition, (width, height): (u32, u32)) -> Option<SeriesLabelPosition> {
    match *legend {
        LegendPosition::None => None,
        LegendPosition::Top => Some(SeriesLabelPosition::UpperMiddle),
        LegendPosition::Bottom => Some(SeriesLabelPosition::LowerMiddle),
        LegendPosition::Left => Some(SeriesLabelPosition::MiddleLeft),
        LegendPosition::Right => Some(SeriesLabelPosition::UpperRight),
        LegendPosition::Inside { x, y } => Some(SeriesLabelPosition::Coordinate(
            (x.clamp(0.0, 1.0) * f64::from(width)) as i32,
            ((1.0 - y.clamp(0.0, 1.0)) * f64::from(height)) as i32,
        )),
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn format_break(value: &f64) -> String {
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
