//! Rendering of run results for the console.
//!
//! Rendering only reads the [`RunResult`]; calling it twice yields the same text.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use cube_model::{CubeDescriptor, CubeOutcome, RunResult};

/// Output format of the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

/// Counts shown at the top of the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub cubes: usize,
    pub passed: usize,
    pub failed: usize,
}

/// JSON form of a run: summary counts followed by the raw result.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: ReportSummary,
    #[serde(flatten)]
    pub result: &'a RunResult,
}

impl<'a> JsonReport<'a> {
    pub fn new(result: &'a RunResult) -> Self {
        Self {
            summary: ReportSummary {
                cubes: result.cube_count(),
                passed: result.passed_count(),
                failed: result.failed_count(),
            },
            result,
        }
    }
}

pub fn render(result: &RunResult, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Table => Ok(render_table(result)),
        ReportFormat::Json => render_json(result),
    }
}

pub fn print_report(result: &RunResult, format: ReportFormat) -> serde_json::Result<()> {
    println!("{}", render(result, format)?);
    Ok(())
}

pub fn render_json(result: &RunResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(result))
}

pub fn render_table(result: &RunResult) -> String {
    let mut sections = Vec::new();

    let mut status_table = Table::new();
    status_table.set_header(vec![
        header_cell("Cube"),
        header_cell("Status"),
        header_cell("Diagnostics"),
    ]);
    apply_table_style(&mut status_table);
    align_column(&mut status_table, 1, CellAlignment::Center);
    align_column(&mut status_table, 2, CellAlignment::Right);
    for (name, outcome) in &result.statuses {
        let count = result.diagnostics_for(name).count();
        status_table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            status_cell(*outcome),
            count_cell(count),
        ]);
    }
    sections.push(format!("Cube Status Summary\n{status_table}"));

    if !result.diagnostics.is_empty() {
        let mut error_table = Table::new();
        error_table.set_header(vec![header_cell("Cube"), header_cell("Diagnostic")]);
        apply_table_style(&mut error_table);
        for message in &result.diagnostics {
            error_table.add_row(vec![
                Cell::new(&message.cube_name).fg(Color::Red),
                Cell::new(&message.text),
            ]);
        }
        sections.push(format!("Detailed Errors\n{error_table}"));
    }

    sections.push(format!(
        "Cubes: {} total, {} passed, {} failed\nCompleted cube validation in {:.2} seconds.",
        result.cube_count(),
        result.passed_count(),
        result.failed_count(),
        result.elapsed_seconds
    ));

    sections.join("\n\n")
}

/// Table of catalog entries for the `cubes` command.
pub fn render_catalog(cubes: &[CubeDescriptor]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Cube"),
        header_cell("Measures"),
        header_cell("Dimensions"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for cube in cubes {
        table.add_row(vec![
            Cell::new(&cube.name).add_attribute(Attribute::Bold),
            Cell::new(cube.measures.len()),
            Cell::new(cube.dimensions.len()),
        ]);
    }
    table.to_string()
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(outcome: CubeOutcome) -> Cell {
    let color = match outcome {
        CubeOutcome::Passed => Color::Green,
        CubeOutcome::Failed => Color::Red,
    };
    Cell::new(outcome.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}
