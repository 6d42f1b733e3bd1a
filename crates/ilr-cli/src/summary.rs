use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ilr_model::Severity;
use ilr_validate::{ResolvedFailure, ValidationOutput};

use crate::types::ValidateResult;

pub fn print_summary(result: &ValidateResult) {
    let report = &result.report;
    println!("Submission: {}", result.submission.display());
    if let Some(ukprn) = result.ukprn {
        println!("UKPRN: {ukprn}");
    }
    if let Some(path) = &result.output {
        println!("Report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Learners"),
        header_cell("Evaluated"),
        header_cell("Skipped"),
        header_cell("Rejects"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Unresolved"),
        header_cell("Defects"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.learners),
        Cell::new(report.learners_evaluated),
        count_cell(report.learners_skipped, Color::Yellow),
        count_cell(report.output.reject_count(), Color::Red),
        count_cell(report.output.error_count(), Color::Red),
        count_cell(report.output.warning_count(), Color::Yellow),
        count_cell(report.output.unresolved_count(), Color::DarkYellow),
        count_cell(report.defects.len(), Color::Magenta),
    ]);
    println!("{table}");
    print_rule_table(&report.output);

    if report.cancelled {
        eprintln!("Run cancelled: results are partial.");
    }
    if !report.defects.is_empty() {
        eprintln!("Rule defects:");
        for defect in &report.defects {
            let rule = defect.rule_name.as_deref().unwrap_or("(derivation)");
            eprintln!("- {} [{rule}]: {}", defect.learn_ref_number, defect.message);
        }
    }
}

/// Failure counts per rule, most severe first.
fn print_rule_table(output: &ValidationOutput) {
    let mut rows: Vec<(&str, Option<Severity>, usize)> = output
        .rule_counts()
        .into_iter()
        .map(|(name, count)| (name, rule_severity(&output.results, name), count))
        .collect();
    if rows.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        severity_rank(b.1)
            .cmp(&severity_rank(a.1))
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for (name, severity, count) in rows {
        let severity_cell = match severity {
            Some(severity) => severity_cell(severity),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            severity_cell,
            Cell::new(count).fg(severity_color(severity)),
        ]);
    }
    println!();
    println!("Failures by rule:");
    println!("{table}");
}

fn rule_severity(results: &[ResolvedFailure], rule_name: &str) -> Option<Severity> {
    results
        .iter()
        .find(|row| row.rule_name == rule_name)
        .and_then(|row| row.severity)
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
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Reject => Cell::new("REJECT")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Option<Severity>) -> u8 {
    match severity {
        Some(Severity::Reject) => 3,
        Some(Severity::Error) => 2,
        Some(Severity::Warning) => 1,
        None => 0,
    }
}

fn severity_color(severity: Option<Severity>) -> Color {
    match severity {
        Some(Severity::Reject | Severity::Error) => Color::Red,
        Some(Severity::Warning) => Color::Yellow,
        None => Color::DarkGrey,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
