use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use adtte_estimate::{RiskRow, StratumSummary};
use adtte_ingest::format_numeric;
use adtte_model::ConfidenceSettings;

use crate::commands::KmResult;

pub fn print_summary(result: &KmResult) {
    println!("Input: {}", result.input.display());
    println!("Model: {}", result.formula);
    if let Some(param) = &result.param {
        println!("Parameter: {param}");
    }
    if let Some(path) = &result.output {
        println!("Plot: {}", path.display());
    }
    for warning in &result.plot.warnings {
        println!("Warning: {warning}");
    }
    println!("{}", median_table(&result.summary, result.conf.as_ref()));
    if !result.risk.is_empty() {
        println!("Number at risk");
        println!("{}", risk_table(&result.risk));
    }
}

pub fn median_table(summary: &[StratumSummary], conf: Option<&ConfidenceSettings>) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Strata"),
        header_cell("N"),
        header_cell("Events"),
        header_cell("Median"),
    ];
    if let Some(conf) = conf {
        header.push(header_cell(&interval_header(conf)));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in summary {
        let mut cells = vec![
            Cell::new(&row.strata),
            Cell::new(row.n),
            count_cell(row.events),
            optional_cell(row.median),
        ];
        if conf.is_some() {
            cells.push(Cell::new(format_interval(row.median_lower, row.median_upper)));
        }
        table.add_row(cells);
    }
    table
}

/// Column title for the median limits, e.g. `80% CI`.
pub fn interval_header(conf: &ConfidenceSettings) -> String {
    let percent = (conf.level * 100.0 * 1e6).round() / 1e6;
    format!("{}% CI", format_numeric(percent))
}

/// One row per stratum, one column per requested time.
pub fn risk_table(rows: &[RiskRow]) -> Table {
    let mut times: Vec<f64> = Vec::new();
    let mut strata: Vec<&str> = Vec::new();
    for row in rows {
        if !times.contains(&row.time) {
            times.push(row.time);
        }
        if !strata.contains(&row.strata.as_str()) {
            strata.push(&row.strata);
        }
    }

    let mut table = Table::new();
    let mut header = vec![header_cell("Strata")];
    header.extend(times.iter().map(|&t| header_cell(&format_numeric(t))));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=times.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for label in strata {
        let mut cells = vec![Cell::new(label)];
        cells.extend(
            rows.iter()
                .filter(|row| row.strata == label)
                .map(|row| Cell::new(row.n_risk)),
        );
        table.add_row(cells);
    }
    table
}

pub fn format_interval(lower: Option<f64>, upper: Option<f64>) -> String {
    let bound = |value: Option<f64>| value.map_or_else(|| "NA".to_string(), format_numeric);
    format!("({}, {})", bound(lower), bound(upper))
}

fn optional_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format_numeric(v)),
        None => dim_cell("NA"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell("0")
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Dim)
}
