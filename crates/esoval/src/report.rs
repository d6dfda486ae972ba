//! Text, CSV and JSON rendering of catalogs, valuations and sweep series.

use std::fmt::Write;

use clap::ValueEnum;
use esoval_core::{Catalog, SweepResult, VariableDescriptor};

/// Column title for valuations.
pub const VALUE_HEADER: &str = "Option value";

/// Output format for sweep series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Format a number with at most `decimals` decimals, dropping trailing zeros
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    if !formatted.contains('.') {
        return formatted;
    }
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Headline valuation, two decimals.
pub fn format_headline(value: f64) -> String {
    format!("{VALUE_HEADER}: {value:.2}")
}

/// Axis value as the dashboard shows it: percents with one decimal.
fn format_axis_value(result: &SweepResult, value: f64) -> String {
    if result.percentage {
        format!("{value:.1}")
    } else {
        format_number(value, 4)
    }
}

fn format_bound(variable: &VariableDescriptor, value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format_number(variable.to_display(v), 4))
}

/// Table of catalog descriptors in display units.
pub fn format_catalog(catalog: &Catalog) -> String {
    let header = ["Name", "Label", "Default", "Min", "Max", "Step", "Unit"];
    let rows: Vec<[String; 7]> = catalog
        .iter()
        .map(|v| {
            [
                v.name.clone(),
                v.display_name.clone(),
                format_bound(v, v.initial_value),
                format_bound(v, v.min_value),
                format_bound(v, v.max_value),
                v.step_size
                    .map_or_else(|| "auto".to_string(), |s| format_number(v.to_display(s), 4)),
                if v.percentage { "%" } else { "" }.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "{}", line(&header));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", line(&cells));
    }
    out.trim_end().to_string()
}

/// Render a sweep series in `format`.
pub fn format_sweep(result: &SweepResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Table => Ok(format_sweep_table(result)),
        OutputFormat::Csv => Ok(format_sweep_csv(result)),
        OutputFormat::Json => serde_json::to_string_pretty(result),
    }
}

fn format_sweep_table(result: &SweepResult) -> String {
    let axis: Vec<String> = result
        .iter()
        .map(|p| format_axis_value(result, p.override_value))
        .collect();
    let values: Vec<String> = result.iter().map(|p| format!("{:.4}", p.valuation)).collect();

    let axis_width = axis
        .iter()
        .map(String::len)
        .chain([result.label.len()])
        .max()
        .unwrap_or_default();
    let value_width = values
        .iter()
        .map(String::len)
        .chain([VALUE_HEADER.len()])
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "{:>axis_width$}  {:>value_width$}", result.label, VALUE_HEADER);
    for (x, v) in axis.iter().zip(&values) {
        let _ = writeln!(out, "{x:>axis_width$}  {v:>value_width$}");
    }
    out.trim_end().to_string()
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_sweep_csv(result: &SweepResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{},{}", csv_field(&result.label), csv_field(VALUE_HEADER));
    for point in result.iter() {
        let axis = format_axis_value(result, point.override_value);
        let _ = writeln!(out, "{axis},{}", point.valuation);
    }
    out
}
