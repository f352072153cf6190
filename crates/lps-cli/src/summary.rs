use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

use lps_common::{format_numeric, format_rupiah};
use lps_model::{
    ColumnKind, FEATURE_COLUMNS, FeatureRecord, PredictionResult, ValidationError, column_kind,
};
use lps_predict::PredictionError;

use crate::types::BatchReport;

#[derive(Serialize)]
struct EstimateJson<'a> {
    record: &'a FeatureRecord,
    scaled: f64,
    price: f64,
}

pub fn print_estimate(record: &FeatureRecord, result: &PredictionResult, json: bool) -> Result<()> {
    if json {
        let payload = EstimateJson {
            record,
            scaled: result.scaled,
            price: result.price,
        };
        let text = serde_json::to_string_pretty(&payload).context("serialize estimate")?;
        println!("{text}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (column, value) in record_fields(record)? {
        table.add_row(vec![Cell::new(column), Cell::new(value)]);
    }
    table.add_row(vec![
        dim_cell("Scaled prediction"),
        dim_cell(format!("{:.4}", result.scaled)),
    ]);
    table.add_row(vec![
        Cell::new("Estimated price")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Cell::new(format_rupiah(result.price))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    Ok(())
}

/// Display text for every feature column of a record, in table order.
pub fn record_fields(record: &FeatureRecord) -> Result<Vec<(&'static str, String)>> {
    let fields = serde_json::to_value(record).context("serialize record")?;
    Ok(FEATURE_COLUMNS
        .into_iter()
        .map(|column| {
            let value = match (column_kind(column), fields.get(column)) {
                (Some(ColumnKind::Categorical), Some(Value::String(text))) => text.clone(),
                (Some(ColumnKind::Numeric), Some(Value::Number(number))) => number
                    .as_f64()
                    .map_or_else(|| number.to_string(), format_numeric),
                _ => "-".to_string(),
            };
            (column, value)
        })
        .collect())
}

pub fn print_rejection(rejection: &ValidationError) {
    eprintln!("The configuration has values the model does not support:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Value"),
        header_cell("Expected"),
    ]);
    apply_table_style(&mut table);
    for violation in &rejection.violations {
        table.add_row(vec![
            Cell::new(violation.column).fg(Color::Yellow),
            Cell::new(&violation.value),
            dim_cell(&violation.expected),
        ]);
    }
    eprintln!("{table}");
}

pub fn print_failure(error: &PredictionError) {
    eprintln!("error: {}", error.user_message());
    eprintln!("  cause: {error}");
}

pub fn print_batch(report: &BatchReport) {
    println!("Input: {}", report.input.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Brand"),
        header_cell("Price"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in &report.rows {
        let brand = row
            .brand
            .as_deref()
            .map_or_else(|| dim_cell("-"), Cell::new);
        let (price, error) = match &row.outcome {
            Ok(result) => (Cell::new(format_rupiah(result.price)), dim_cell("-")),
            Err(reason) => (dim_cell("-"), Cell::new(reason).fg(Color::Red)),
        };
        table.add_row(vec![Cell::new(row.row), brand, price, error]);
    }
    let failed = report.failed();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(report.rows.len() - failed).add_attribute(Attribute::Bold),
        count_cell(failed),
    ]);
    println!("{table}");
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

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell("0 failed")
    } else {
        Cell::new(format!("{count} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
