use chrono::NaiveDate;
use ilr_model::{EmploymentStatusCode, Severity};
use ilr_reference::{
    ContractAllocation, DateWindow, QualificationValidity, ReferenceData, ReferenceTables,
    RuleMetadata, StandardValidity,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn tables() -> ReferenceTables {
    ReferenceTables {
        qualifications: vec![
            QualificationValidity {
                learn_aim_ref: "60012345".to_string(),
                category: "ADULT_SKILLS".to_string(),
                start: date(2020, 8, 1),
                end: Some(date(2021, 7, 31)),
            },
            QualificationValidity {
                learn_aim_ref: "60012345".to_string(),
                category: "adult_skills".to_string(),
                start: date(2018, 1, 1),
                end: Some(date(2019, 7, 31)),
            },
            QualificationValidity {
                learn_aim_ref: "zprog001".to_string(),
                category: "APPRENTICESHIP_ANY".to_string(),
                start: date(2018, 1, 1),
                end: None,
            },
        ],
        aim_refs: vec!["CATALOGUED".to_string()],
        standards: vec![StandardValidity {
            std_code: 17,
            start: date(2017, 5, 1),
            end: Some(date(2022, 7, 31)),
        }],
        contracts: vec![ContractAllocation {
            contract_ref: "ESF-1234".to_string(),
            ukprn: Some(10_000_001),
            start: date(2019, 1, 1),
            end: Some(date(2021, 12, 31)),
            permitted_emp_stats: vec![EmploymentStatusCode::NotEmployedLookingForWork],
            permitted_sector_codes: vec![],
        }],
        organisations: (1..=5).collect(),
        postcodes: vec!["CV1 2WT".to_string()],
        ulns: vec![1_000_000_042],
        employers: vec![154_549_452],
        rules: vec![
            RuleMetadata {
                rule_name: "ULN_03".to_string(),
                severity: Some(Severity::Error),
                message: "The ULN {ULN} is not on the learner register".to_string(),
            },
            RuleMetadata {
                rule_name: "uln_03".to_string(),
                severity: Some(Severity::Warning),
                message: "duplicate".to_string(),
            },
        ],
    }
}

#[test]
fn organisation_existence() {
    let reference = ReferenceData::build(tables());
    assert!(reference.organisation_exists(3));
    assert!(!reference.organisation_exists(6));
}

#[test]
fn qualification_windows_are_case_insensitive_and_ordered() {
    let reference = ReferenceData::build(tables());
    let windows = reference.qualification_windows("60012345", "Adult_Skills");
    assert_eq!(
        windows,
        &[
            DateWindow::new(date(2018, 1, 1), Some(date(2019, 7, 31))),
            DateWindow::new(date(2020, 8, 1), Some(date(2021, 7, 31))),
        ]
    );
    assert!(reference.aim_valid_on("60012345", "ADULT_SKILLS", date(2019, 7, 31)));
    assert!(!reference.aim_valid_on("60012345", "ADULT_SKILLS", date(2019, 8, 1)));
    assert!(reference.qualification_windows("60012345", "ESF").is_empty());
    assert!(reference.qualification_windows("UNKNOWN", "ADULT_SKILLS").is_empty());
}

#[test]
fn open_ended_qualification_window_scenario() {
    let reference = ReferenceData::build(tables());
    assert!(reference.aim_valid_on("ZPROG001", "APPRENTICESHIP_ANY", date(2018, 1, 1)));
    assert!(!reference.aim_valid_on("ZPROG001", "APPRENTICESHIP_ANY", date(2017, 12, 31)));
}

#[test]
fn aims_without_validity_rows_still_exist() {
    let reference = ReferenceData::build(tables());
    assert!(reference.aim_exists("catalogued"));
    assert!(reference.aim_exists("60012345"));
    assert!(!reference.aim_exists("60099999"));
}

#[test]
fn standards_and_contracts() {
    let reference = ReferenceData::build(tables());
    assert!(reference.standard_exists(17));
    assert!(reference.standard_valid_on(17, date(2022, 7, 31)));
    assert!(!reference.standard_valid_on(17, date(2022, 8, 1)));
    assert!(!reference.standard_exists(18));
    assert!(reference.standard_windows(18).is_empty());

    let contract = reference.contract("esf-1234").expect("contract");
    assert_eq!(contract.ukprn, Some(10_000_001));
    assert!(contract.permits_emp_stat(EmploymentStatusCode::NotEmployedLookingForWork));
    assert!(!contract.permits_emp_stat(EmploymentStatusCode::InPaidEmployment));
    assert!(contract.permits_sector("anything"));
    assert!(!reference.contract_exists("ESF-9999"));
}

#[test]
fn existence_sets() {
    let reference = ReferenceData::build(tables());
    assert!(reference.postcode_exists("cv12wt"));
    assert!(reference.postcode_exists(" CV1 2WT "));
    assert!(!reference.postcode_exists("B1 1AA"));
    assert!(reference.uln_exists(1_000_000_042));
    assert!(!reference.uln_exists(1_000_000_043));
    assert!(reference.employer_exists(154_549_452));
}

#[test]
fn rule_metadata_is_case_insensitive_and_first_row_wins() {
    let reference = ReferenceData::build(tables());
    let rule = reference.rule_metadata("Uln_03").expect("rule");
    assert_eq!(rule.severity, Some(Severity::Error));
    assert_eq!(rule.rule_name, "ULN_03");
    assert!(reference.rule_metadata("ULN_04").is_none());
    assert_eq!(reference.summary().rules, 1);
}

#[test]
fn empty_cache_misses_everything() {
    let reference = ReferenceData::empty();
    assert!(!reference.aim_exists("60012345"));
    assert!(!reference.organisation_exists(1));
    assert!(reference.rule_metadata("ULN_03").is_none());
    assert!(reference.contract("ESF-1234").is_none());
}
