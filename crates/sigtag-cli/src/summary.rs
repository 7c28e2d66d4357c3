use std::convert::Infallible;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sigtag_map::{
    Diagnostic, DiagnosticKind, DioState, MetadataSummary, PlanOutcome, PlannedSignal,
    SeriesTrace, SignalRenderer,
};
use sigtag_model::format_numeric;

use crate::commands::StepResult;

/// Renders planned signals as one table per group, one column per source.
#[derive(Debug, Default)]
pub struct TableRenderer;

impl SignalRenderer for TableRenderer {
    type Output = Table;
    type Error = Infallible;

    fn render_discrete(
        &mut self,
        signals: &[PlannedSignal],
        labels: &[String],
    ) -> Result<Table, Infallible> {
        Ok(signal_table(signals, labels, state_cell))
    }

    fn render_continuous(
        &mut self,
        signals: &[PlannedSignal],
        labels: &[String],
    ) -> Result<Table, Infallible> {
        Ok(signal_table(signals, labels, range_cell))
    }
}

fn signal_table(
    signals: &[PlannedSignal],
    labels: &[String],
    trace_cell: fn(&SeriesTrace) -> Cell,
) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Tag"), header_cell("Description")];
    header.extend(labels.iter().map(|label| header_cell(label)));
    table.set_header(header);
    apply_table_style(&mut table);
    for signal in signals {
        let mut row = vec![
            Cell::new(&signal.tag)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            match &signal.description {
                Some(description) => Cell::new(description),
                None => dim_cell("-"),
            },
        ];
        for label in labels {
            row.push(
                signal
                    .traces
                    .iter()
                    .find(|trace| &trace.label == label)
                    .map_or_else(|| dim_cell("-"), trace_cell),
            );
        }
        table.add_row(row);
    }
    table
}

fn state_cell(trace: &SeriesTrace) -> Cell {
    match trace.final_state {
        Some(DioState::On) => Cell::new("ON")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(DioState::Off) => Cell::new("OFF").fg(Color::DarkGrey),
        None => dim_cell("-"),
    }
}

fn range_cell(trace: &SeriesTrace) -> Cell {
    let points: Vec<f64> = trace.points.iter().flatten().copied().collect();
    let Some(last) = points.last() else {
        return dim_cell("no samples");
    };
    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Cell::new(format!(
        "{} [{} .. {}]",
        format_numeric(*last),
        format_numeric(min),
        format_numeric(max)
    ))
}

pub fn print_metadata_summaries(summaries: &[MetadataSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Columns"),
        header_cell("Rows"),
        header_cell("Tags"),
        header_cell("Descriptions"),
        header_cell("Usable"),
        header_cell("Mapped"),
        header_cell("Untagged"),
        header_cell("Duplicates"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..9 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in summaries {
        let mismatch = summary.tag_names != summary.descriptions
            || summary.tag_names != summary.columns;
        table.add_row(vec![
            Cell::new(&summary.label)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.columns),
            Cell::new(summary.rows),
            count_cell(summary.tag_names, mismatch),
            count_cell(summary.descriptions, mismatch),
            Cell::new(summary.usable_positions),
            Cell::new(summary.mapped_tags),
            Cell::new(summary.untagged),
            warning_count_cell(summary.duplicates.len()),
        ]);
    }
    println!("{table}");

    for summary in summaries {
        if summary.samples.is_empty() {
            continue;
        }
        let mut samples = Table::new();
        samples.set_header(vec![
            header_cell("#"),
            header_cell("Column"),
            header_cell("Tag"),
            header_cell("Description"),
        ]);
        apply_table_style(&mut samples);
        align_column(&mut samples, 0, CellAlignment::Right);
        for record in &summary.samples {
            samples.add_row(vec![
                Cell::new(record.position),
                Cell::new(&record.column),
                Cell::new(record.tag.as_deref().unwrap_or("-")),
                Cell::new(record.description.as_deref().unwrap_or("-")),
            ]);
        }
        println!();
        println!("{}:", summary.label);
        println!("{samples}");
        for duplicate in &summary.duplicates {
            println!(
                "  duplicate tag {} at positions {:?}",
                duplicate.tag, duplicate.positions
            );
        }
        print_diagnostics(&summary.diagnostics.iter().collect::<Vec<_>>());
    }
}

pub fn print_step_results(results: &[StepResult]) {
    let mut overview = Table::new();
    overview.set_header(vec![
        header_cell("Step"),
        header_cell("Requested"),
        header_cell("Discrete"),
        header_cell("Continuous"),
        header_cell("Status"),
        header_cell("Diagnostics"),
    ]);
    apply_summary_table_style(&mut overview);
    for index in 1..4 {
        align_column(&mut overview, index, CellAlignment::Right);
    }
    align_column(&mut overview, 5, CellAlignment::Right);
    for result in results {
        let (discrete, continuous) = match result.report.outcome.plan() {
            Some(plan) => (Some(plan.discrete.len()), Some(plan.continuous.len())),
            None => (None, None),
        };
        overview.add_row(vec![
            Cell::new(&result.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(result.tags.len()),
            optional_count_cell(discrete),
            optional_count_cell(continuous),
            outcome_cell(&result.report.outcome),
            warning_count_cell(result.report.all_diagnostics().len()),
        ]);
    }
    println!("{overview}");

    for result in results {
        println!();
        println!("Step {}:", result.name);
        if let Some(plan) = result.report.outcome.plan() {
            let mut renderer = TableRenderer;
            let Ok(rendered) = plan.render(&mut renderer);
            if let Some(table) = rendered.discrete {
                println!("Discrete signals:");
                println!("{table}");
            }
            if let Some(table) = rendered.continuous {
                println!("Continuous signals:");
                println!("{table}");
            }
        }
        print_diagnostics(&result.report.all_diagnostics());
    }
}

fn print_diagnostics(diagnostics: &[&Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Message")]);
    apply_table_style(&mut table);
    for diagnostic in diagnostics {
        table.add_row(vec![
            kind_cell(diagnostic.kind()),
            Cell::new(diagnostic.to_string()),
        ]);
    }
    println!("Diagnostics:");
    println!("{table}");
}

fn kind_cell(kind: DiagnosticKind) -> Cell {
    let color = match kind {
        DiagnosticKind::ExtractionFailure
        | DiagnosticKind::ClassificationFailure
        | DiagnosticKind::EmptyIntersection => Color::Red,
        DiagnosticKind::MetadataMismatch
        | DiagnosticKind::UnresolvedTag
        | DiagnosticKind::DuplicateSelection
        | DiagnosticKind::ColumnSubstituted => Color::Yellow,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn outcome_cell(outcome: &PlanOutcome) -> Cell {
    match outcome {
        PlanOutcome::Ready(_) => Cell::new("ready").fg(Color::Green),
        PlanOutcome::NoData => Cell::new("no data").fg(Color::Yellow),
        PlanOutcome::NoCommonSignals => Cell::new("no common signals").fg(Color::Yellow),
    }
}

fn count_cell(value: usize, highlight: bool) -> Cell {
    if highlight {
        Cell::new(value).fg(Color::Yellow)
    } else {
        Cell::new(value)
    }
}

fn warning_count_cell(value: usize) -> Cell {
    if value > 0 {
        Cell::new(value)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(value)
    }
}

fn optional_count_cell(value: Option<usize>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
