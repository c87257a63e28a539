//! Tables printed after `run` and by `list`.

use std::collections::BTreeMap;
use std::time::Duration;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use etl_pipeline::{Pipeline, RunSummary};

pub fn print_run_summary(summary: &RunSummary) {
    println!("Pipeline: {}", summary.pipeline);
    println!("{}", run_summary_table(summary));
}

pub fn print_pipelines(pipelines: &BTreeMap<String, Pipeline>) {
    println!("{}", pipeline_table(pipelines));
}

/// One row per executed node plus a total row.
pub fn run_summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Node"),
        header_cell("Input"),
        header_cell("Output"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Time"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for node in &summary.nodes {
        table.add_row(vec![
            Cell::new(&node.node),
            Cell::new(&node.input),
            Cell::new(&node.output),
            Cell::new(node.input_rows),
            Cell::new(node.output_rows),
            dim_cell(format_duration(node.elapsed)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format_duration(summary.elapsed)).add_attribute(Attribute::Bold),
    ]);
    table
}

/// One row per node of every registered pipeline.
pub fn pipeline_table(pipelines: &BTreeMap<String, Pipeline>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pipeline"),
        header_cell("Node"),
        header_cell("Input"),
        header_cell("Output"),
        header_cell("Tags"),
    ]);
    apply_table_style(&mut table);

    for (name, pipeline) in pipelines {
        for node in pipeline.nodes() {
            let tags = if node.tags().is_empty() {
                dim_cell("-")
            } else {
                Cell::new(node.tags().iter().cloned().collect::<Vec<_>>().join(", "))
            };
            table.add_row(vec![
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new(node.name()),
                Cell::new(node.input()),
                Cell::new(node.output()),
                tags,
            ]);
        }
    }
    table
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(42)), "42ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
