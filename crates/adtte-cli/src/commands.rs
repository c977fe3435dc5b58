use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use adtte_estimate::{RiskRow, StratumSummary, estimate_km, risk_table, summarize};
use adtte_ingest::{parse_f64, read_adtte_csv};
use adtte_model::{ConfidenceSettings, EstimateOptions, LegendSpec, PlotOptions, TickRule, Transform};
use adtte_plot::{SurvivalPlot, plot};
use adtte_render::save_svg;

use crate::cli::KmArgs;
use crate::summary::{apply_table_style, header_cell};

/// Everything produced by one `km` run.
pub struct KmResult {
    pub input: PathBuf,
    pub formula: String,
    pub param: Option<String>,
    /// Confidence level and scale of the median limits, when bounds exist.
    pub conf: Option<ConfidenceSettings>,
    pub plot: SurvivalPlot,
    pub summary: Vec<StratumSummary>,
    pub risk: Vec<RiskRow>,
    pub output: Option<PathBuf>,
}

pub fn run_km(args: &KmArgs) -> Result<KmResult> {
    let span = info_span!("km", input = %args.input.display());
    let _guard = span.enter();

    let df = read_adtte_csv(&args.input)
        .with_context(|| format!("load {}", args.input.display()))?;
    info!(rows = df.height(), columns = df.width(), "loaded dataset");

    let strata: Vec<&str> = args.strata.iter().map(String::as_str).collect();
    let estimate_options = EstimateOptions::new()
        .with_conf_int(args.conf_int)
        .with_conf_type(args.conf_type.into());
    let fit = estimate_km(&df, &strata, &estimate_options).context("estimate survival")?;
    info!(strata = fit.strata.len(), rows = fit.len(), "fitted Kaplan-Meier curves");

    let mut plot_options = PlotOptions::new()
        .with_fun(args.fun.as_str())
        .with_legend(parse_legend(&args.legend)?)
        .with_ci(!args.no_ci)
        .with_censor_marks(args.censor);
    if let Some(units) = &args.x_units {
        plot_options = plot_options.with_x_units(units.as_str());
    }

    let drawn = plot(&fit, &plot_options).context("build plot")?;
    let summary = summarize(&fit);
    let risk = risk_table(&fit, &drawn.chart.x_axis.breaks);

    if let Some(path) = &args.output {
        save_svg(&drawn.chart, path, (args.width, args.height))
            .with_context(|| format!("write plot {}", path.display()))?;
    }

    Ok(KmResult {
        input: args.input.clone(),
        formula: fit.call.formula.clone(),
        param: fit.param_label().map(str::to_string),
        conf: fit.conf,
        plot: drawn,
        summary,
        risk,
        output: args.output.clone(),
    })
}

/// Reads a legend argument: a position name, or `X,Y` inside the panel.
pub fn parse_legend(value: &str) -> Result<LegendSpec> {
    if !value.contains(',') {
        return Ok(LegendSpec::Name(value.trim().to_string()));
    }
    let coords = value
        .split(',')
        .map(|part| parse_f64(part).with_context(|| format!("invalid legend coordinate '{part}'")))
        .collect::<Result<Vec<f64>>>()?;
    Ok(LegendSpec::Coords(coords))
}

pub fn run_transforms() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Y label"),
        header_cell("Y ticks"),
    ]);
    apply_table_style(&mut table);
    for transform in Transform::ALL {
        table.add_row(vec![
            transform.as_str().to_string(),
            transform.y_label().to_string(),
            describe_ticks(transform),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn describe_ticks(transform: Transform) -> String {
    match transform.tick_rule() {
        TickRule::Fixed { lo, hi } => format!("{lo} to {hi}"),
        TickRule::RoundedRange => "rounded data range".to_string(),
    }
}
