use std::fs;
use std::path::Path;

use ilr_model::Severity;
use ilr_reference::{ReferenceData, ReferenceError, ReferenceTables, load_rule_table_csv};

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}

#[test]
fn loads_rule_table_with_any_column_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.csv");
    write(
        &path,
        "Message,Rule Name,Severity\n\
         \"The ULN {ULN} is not valid\",ULN_03,E\n\
         \"Postcode {Postcode} not found\",Postcode_14,W\n\
         \"no severity\",AFinType_13,\n\
         \"blank name\",,E\n",
    );

    let rules = load_rule_table_csv(&path).expect("load rules");
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0].rule_name, "ULN_03");
    assert_eq!(rules[0].severity, Some(Severity::Error));
    assert_eq!(rules[0].message, "The ULN {ULN} is not valid");
    assert_eq!(rules[1].severity, Some(Severity::Warning));
    assert_eq!(rules[2].severity, None);
}

#[test]
fn rejects_unknown_severity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.csv");
    write(&path, "Rule Name,Severity,Message\nULN_03,Fatal,x\n");

    let error = load_rule_table_csv(&path).expect_err("invalid severity");
    assert!(matches!(
        error,
        ReferenceError::InvalidValue {
            field: "severity",
            ..
        }
    ));
}

#[test]
fn reports_missing_column_and_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.csv");
    write(&path, "Rule Name,Message\nULN_03,x\n");
    let error = load_rule_table_csv(&path).expect_err("missing column");
    assert!(matches!(
        error,
        ReferenceError::MissingColumn {
            column: "Severity",
            ..
        }
    ));

    let missing = dir.path().join("absent.csv");
    let error = load_rule_table_csv(&missing).expect_err("missing file");
    assert!(matches!(error, ReferenceError::FileNotFound { .. }));
}

#[test]
fn json_bundle_builds_cache() {
    let bundle = r#"{
        "qualifications": [
            { "learn_aim_ref": "60012345", "category": "ADULT_SKILLS", "start": "2018-01-01" }
        ],
        "standards": [ { "std_code": 17, "start": "2017-05-01", "end": "2022-07-31" } ],
        "contracts": [
            { "contract_ref": "ESF-1234", "start": "2019-01-01", "permitted_emp_stats": [11, 12] }
        ],
        "organisations": [1, 2, 3],
        "rules": [ { "rule_name": "ULN_03", "severity": "Error", "message": "m" } ]
    }"#;

    let tables = ReferenceTables::from_json_reader(bundle.as_bytes()).expect("parse bundle");
    let reference = ReferenceData::build(tables);
    let summary = reference.summary();
    assert_eq!(summary.aims, 1);
    assert_eq!(summary.standards, 1);
    assert_eq!(summary.contracts, 1);
    assert_eq!(summary.organisations, 3);
    assert_eq!(summary.ulns, 0);
    assert_eq!(
        reference.rule_metadata("uln_03").and_then(|rule| rule.severity),
        Some(Severity::Error)
    );
}

#[test]
fn json_rule_severities_accept_csv_codes() {
    let bundle = r#"{
        "rules": [
            { "rule_name": "ULN_03", "severity": "E" },
            { "rule_name": "Postcode_14", "severity": "W" },
            { "rule_name": "AFinType_13", "severity": null }
        ]
    }"#;
    let tables = ReferenceTables::from_json_reader(bundle.as_bytes()).expect("parse bundle");
    let severities: Vec<Option<Severity>> = tables.rules.iter().map(|rule| rule.severity).collect();
    assert_eq!(
        severities,
        vec![Some(Severity::Error), Some(Severity::Warning), None]
    );

    let error = ReferenceTables::from_json_reader(
        r#"{ "rules": [{ "rule_name": "ULN_03", "severity": "Fatal" }] }"#.as_bytes(),
    )
    .expect_err("unknown severity");
    assert!(error.to_string().contains("<reader>"));
}

#[test]
fn json_bundle_errors_carry_origin() {
    let error = ReferenceTables::from_json_reader("{ not json".as_bytes()).expect_err("invalid");
    assert!(error.to_string().contains("<reader>"));
}
