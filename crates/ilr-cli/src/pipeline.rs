//! Load, validate, and write: the stages behind `ilr-validator validate`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use ilr_model::Submission;
use ilr_reference::{ReferenceData, ReferenceTables, load_rule_table_csv};
use ilr_validate::{
    CancellationToken, EngineOptions, RuleSet, ValidationEngine, ValidationReport, catalogue,
};

use crate::logging::redact_value;

/// Read a submission from a JSON file.
pub fn load_submission(path: &Path) -> Result<Submission> {
    let file = File::open(path)
        .with_context(|| format!("open submission {}", path.display()))?;
    let submission: Submission = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse submission {}", path.display()))?;
    info!(
        learners = submission.learners.len(),
        ukprn = submission.ukprn,
        "Submission loaded"
    );
    Ok(submission)
}

/// Build the reference cache from a JSON bundle and an optional rules CSV.
///
/// Rules from the CSV replace any rule rows in the bundle.
pub fn load_reference(bundle: &Path, rules_csv: Option<&Path>) -> Result<ReferenceData> {
    let mut tables = ReferenceTables::from_json_path(bundle)
        .with_context(|| format!("load reference bundle {}", bundle.display()))?;
    if let Some(path) = rules_csv {
        let rules = load_rule_table_csv(path)
            .with_context(|| format!("load rule table {}", path.display()))?;
        tables.rules = rules;
    }
    Ok(ReferenceData::build(tables))
}

/// Run the catalogue over every learner in the submission.
pub fn run_validation(
    submission: &Submission,
    reference: Arc<ReferenceData>,
    options: &EngineOptions,
) -> Result<ValidationReport> {
    let span = info_span!("run", learners = submission.learners.len());
    let _guard = span.enter();
    let started = Instant::now();

    let rule_set = RuleSet::builder()
        .reference(reference)
        .rules(catalogue::standard_rules())
        .build()
        .context("assemble rule set")?;
    let engine = ValidationEngine::new(rule_set, options).context("start validation engine")?;
    let report = engine.validate(&submission.learners, &CancellationToken::none());

    for row in &report.output.results {
        trace!(
            learner = redact_value(&row.learn_ref_number),
            rule = %row.rule_name,
            aim_seq_number = row.aim_seq_number,
            "Failure"
        );
    }
    info!(
        results = report.output.len(),
        defects = report.defects.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "Validation complete"
    );
    Ok(report)
}

/// Write the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &ValidationReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(path = %path.display(), "Report written");
    Ok(())
}
