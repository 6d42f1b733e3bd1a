//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ilr_cli::pipeline::{load_reference, load_submission, run_validation, write_report};
use ilr_model::Severity;
use ilr_validate::EngineOptions;

const SUBMISSION: &str = r#"{
    "ukprn": 10000001,
    "learners": [
        {
            "learn_ref_number": "L2",
            "uln": 1000000043,
            "date_of_birth": "1990-01-01",
            "postcode_prior": "CV1 2WT",
            "learning_deliveries": [
                {
                    "aim_seq_number": 1,
                    "learn_aim_ref": "60012345",
                    "aim_type": 4,
                    "fund_model": 35,
                    "learn_start_date": "2019-09-01",
                    "learn_planned_end_date": "2020-06-30",
                    "comp_status": 1
                }
            ],
            "employment_statuses": [
                { "emp_stat": 10, "date_emp_stat_app": "2019-08-01", "emp_id": 154549452 }
            ]
        },
        {
            "learn_ref_number": "L1",
            "uln": 1000000042,
            "date_of_birth": "1990-01-01",
            "postcode_prior": "cv1 2wt",
            "learning_deliveries": [
                {
                    "aim_seq_number": 1,
                    "learn_aim_ref": "60012345",
                    "aim_type": 4,
                    "fund_model": 35,
                    "learn_start_date": "2019-09-01",
                    "learn_planned_end_date": "2020-06-30",
                    "comp_status": 1
                }
            ],
            "employment_statuses": [
                { "emp_stat": 10, "date_emp_stat_app": "2019-08-01", "emp_id": 154549452 }
            ]
        }
    ]
}"#;

const BUNDLE: &str = r#"{
    "qualifications": [
        { "learn_aim_ref": "60012345", "category": "ADULT_SKILLS", "start": "2018-01-01" }
    ],
    "organisations": [10000001],
    "postcodes": ["CV1 2WT"],
    "ulns": [1000000042],
    "employers": [154549452],
    "rules": [
        { "rule_name": "ULN_03", "severity": "Warning", "message": "ULN {ULN} unknown" }
    ]
}"#;

const RULES_CSV: &str = "Rule Name,Severity,Message\n\
                         ULN_03,E,The ULN {ULN} is not on the learner register\n";

struct Fixture {
    _dir: tempfile::TempDir,
    submission: PathBuf,
    bundle: PathBuf,
    rules: PathBuf,
    output: PathBuf,
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let submission = dir.path().join("submission.json");
    let bundle = dir.path().join("reference.json");
    let rules = dir.path().join("rules.csv");
    write(&submission, SUBMISSION);
    write(&bundle, BUNDLE);
    write(&rules, RULES_CSV);
    let output = dir.path().join("report.json");
    Fixture {
        _dir: dir,
        submission,
        bundle,
        rules,
        output,
    }
}

#[test]
fn loads_submission_from_json() {
    let fixture = fixture();
    let submission = load_submission(&fixture.submission).expect("load submission");
    assert_eq!(submission.ukprn, Some(10_000_001));
    assert_eq!(submission.learners.len(), 2);
    assert_eq!(submission.learners[0].learn_ref_number, "L2");
    assert_eq!(submission.learners[0].learning_deliveries.len(), 1);
}

#[test]
fn missing_submission_names_the_path() {
    let fixture = fixture();
    let missing = fixture.submission.with_file_name("absent.json");
    let error = load_submission(&missing).expect_err("missing file");
    assert!(format!("{error:#}").contains("absent.json"));
}

#[test]
fn rules_csv_replaces_bundle_rules() {
    let fixture = fixture();
    let bundle_only = load_reference(&fixture.bundle, None).expect("bundle");
    let metadata = bundle_only.rule_metadata("uln_03").expect("bundle rule");
    assert_eq!(metadata.severity, Some(Severity::Warning));

    let with_csv = load_reference(&fixture.bundle, Some(&fixture.rules)).expect("bundle + csv");
    let metadata = with_csv.rule_metadata("ULN_03").expect("csv rule");
    assert_eq!(metadata.severity, Some(Severity::Error));
    assert_eq!(metadata.message, "The ULN {ULN} is not on the learner register");
    assert_eq!(with_csv.summary().rules, 1);
}

#[test]
fn validates_and_writes_report() {
    let fixture = fixture();
    let submission = load_submission(&fixture.submission).expect("load submission");
    let reference = load_reference(&fixture.bundle, Some(&fixture.rules)).expect("reference");
    let report = run_validation(
        &submission,
        Arc::new(reference),
        &EngineOptions::new().with_threads(2),
    )
    .expect("run");

    assert_eq!(report.learners_evaluated, 2);
    assert_eq!(report.learners_skipped, 0);
    assert!(report.defects.is_empty());
    assert!(!report.cancelled);
    assert!(report.has_blocking_issues());

    let summary: Vec<String> = report
        .output
        .results
        .iter()
        .map(|row| {
            format!(
                "{} {} {}",
                row.learn_ref_number,
                row.rule_name,
                row.message.as_deref().unwrap_or("-")
            )
        })
        .collect();
    insta::assert_snapshot!(
        summary.join("\n"),
        @"L2 ULN_03 The ULN 1000000043 is not on the learner register"
    );

    write_report(&fixture.output, &report).expect("write report");
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&fixture.output).expect("read report"))
            .expect("parse report");
    assert_eq!(written["learners_evaluated"], 2);
    assert_eq!(written["cancelled"], false);
    let results = written["results"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["rule_name"], "ULN_03");
    assert_eq!(results[0]["learn_ref_number"], "L2");
    assert_eq!(results[0]["severity"], "Error");
    assert_eq!(results[0]["aim_seq_number"], serde_json::Value::Null);
}

#[test]
fn clean_submission_has_no_blocking_issues() {
    let fixture = fixture();
    let mut submission = load_submission(&fixture.submission).expect("load submission");
    submission.learners.retain(|learner| learner.learn_ref_number == "L1");
    let reference = load_reference(&fixture.bundle, None).expect("reference");
    let report =
        run_validation(&submission, Arc::new(reference), &EngineOptions::new()).expect("run");
    assert!(report.output.is_empty());
    assert!(!report.has_blocking_issues());
}
