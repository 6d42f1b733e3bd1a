use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::{info, info_span};

use ilr_cli::pipeline::{load_reference, load_submission, run_validation, write_report};
use ilr_reference::{ReferenceData, ReferenceTables, load_rule_table_csv};
use ilr_validate::{EngineOptions, Rule, catalogue};

use crate::cli::{RulesArgs, ValidateArgs};
use crate::summary::{apply_table_style, dim_cell, severity_cell};
use crate::types::ValidateResult;

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateResult> {
    let span = info_span!("validate", submission = %args.submission.display());
    let _guard = span.enter();

    let submission = load_submission(&args.submission)?;
    let reference = load_reference(&args.reference, args.rules.as_deref())?;
    let summary = reference.summary();
    info!(
        aims = summary.aims,
        standards = summary.standards,
        contracts = summary.contracts,
        rules = summary.rules,
        "Reference data loaded"
    );

    let options = match args.threads {
        Some(threads) => EngineOptions::new().with_threads(threads),
        None => EngineOptions::new(),
    };
    let report = run_validation(&submission, Arc::new(reference), &options)?;
    if let Some(path) = &args.output {
        write_report(path, &report)?;
    }

    Ok(ValidateResult {
        submission: args.submission.clone(),
        ukprn: submission.ukprn,
        learners: submission.learners.len(),
        report,
        output: args.output.clone(),
    })
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let reference = match &args.rules {
        Some(path) => {
            let rules = load_rule_table_csv(path)
                .with_context(|| format!("load rule table {}", path.display()))?;
            ReferenceData::build(ReferenceTables::default().with_rule_table(rules))
        }
        None => ReferenceData::empty(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Rule", "Scope", "Severity", "Description"]);
    apply_table_style(&mut table);
    for rule in catalogue::standard_rules() {
        let severity = match reference
            .rule_metadata(rule.name())
            .and_then(|metadata| metadata.severity)
        {
            Some(severity) => severity_cell(severity),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(rule.name()),
            Cell::new(rule.scope().label()),
            severity,
            Cell::new(rule.description()),
        ]);
    }
    println!("{table}");
    Ok(())
}
