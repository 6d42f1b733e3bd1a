mod common;

use common::{apprentice, clean_learner, date, delivery, esf_learner, reference, restarted};
use ilr_model::{CompletionStatus, Learner, ProgType};
use ilr_validate::catalogue::standard_rules;
use ilr_validate::{EngineOptions, Rule, RuleScope, RuleSet, ValidationEngine};

fn engine() -> ValidationEngine {
    let rule_set = RuleSet::builder()
        .reference(reference())
        .rules(standard_rules())
        .build()
        .expect("catalogue builds");
    ValidationEngine::new(rule_set, &EngineOptions::new().with_threads(1)).expect("engine")
}

/// (rule name, aim sequence number) for every failure, sorted.
fn failures(learner: &Learner) -> Vec<(String, Option<u32>)> {
    let outcome = engine().evaluate_learner(learner);
    assert!(outcome.defects.is_empty(), "{:?}", outcome.defects);
    let mut failures: Vec<_> = outcome
        .failures
        .into_iter()
        .map(|failure| (failure.rule_name, failure.aim_seq_number))
        .collect();
    failures.sort();
    failures
}

fn on_aim(rule: &str, aim_seq: u32) -> (String, Option<u32>) {
    (rule.to_string(), Some(aim_seq))
}

#[test]
fn catalogue_has_unique_named_rules() {
    let rules = standard_rules();
    assert_eq!(rules.len(), 17);
    assert!(rules.iter().all(|rule| !rule.description().is_empty()));
    assert_eq!(
        rules
            .iter()
            .filter(|rule| rule.scope() == RuleScope::Learner)
            .map(Rule::name)
            .collect::<Vec<_>>(),
        vec!["ULN_03", "Postcode_14"]
    );
}

#[test]
fn fixtures_are_clean() {
    assert!(failures(&clean_learner("L1")).is_empty());
    assert!(failures(&apprentice("L2")).is_empty());
    assert!(failures(&esf_learner("L3")).is_empty());
}

#[test]
fn unknown_uln_fails_but_temporary_uln_passes() {
    let mut learner = clean_learner("L1");
    learner.uln = Some(1_000_000_043);
    let outcome = engine().evaluate_learner(&learner);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].rule_name, "ULN_03");
    assert_eq!(outcome.failures[0].aim_seq_number, None);
    assert_eq!(outcome.failures[0].parameter("ULN"), Some("1000000043"));

    learner.uln = Some(9_999_999_999);
    assert!(failures(&learner).is_empty());
}

#[test]
fn unknown_postcode_fails_but_placeholder_passes() {
    let mut learner = clean_learner("L1");
    learner.postcode_prior = Some("B1 1AA".to_string());
    assert_eq!(failures(&learner), vec![("Postcode_14".to_string(), None)]);

    learner.postcode_prior = Some("zz99 9zz".to_string());
    assert!(failures(&learner).is_empty());
}

#[test]
fn adult_skills_learner_under_19() {
    let mut learner = clean_learner("L1");
    learner.date_of_birth = Some(date(2002, 1, 1));
    assert_eq!(failures(&learner), vec![on_aim("DateOfBirth_48", 1)]);
}

#[test]
fn missing_employment_status_at_start() {
    let mut learner = clean_learner("L1");
    learner.employment_statuses.clear();
    assert_eq!(failures(&learner), vec![on_aim("EmpStat_01", 1)]);
}

#[test]
fn unknown_employer_is_reported_against_learner() {
    let mut learner = clean_learner("L1");
    learner.employment_statuses[0].emp_id = Some(123_456_789);
    assert_eq!(failures(&learner), vec![("EmpId_01".to_string(), None)]);

    learner.employment_statuses[0].emp_id = Some(999_999_999);
    assert!(failures(&learner).is_empty());
}

#[test]
fn unknown_aim_fails_catalogue_and_category_checks() {
    let mut learner = clean_learner("L1");
    learner.learning_deliveries[0].learn_aim_ref = "UNKNOWN1".to_string();
    assert_eq!(
        failures(&learner),
        vec![on_aim("LearnAimRef_01", 1), on_aim("LearnAimRef_55", 1)]
    );
}

#[test]
fn expired_aim_fails_only_when_qualifying() {
    let mut learner = clean_learner("L1");
    learner.learning_deliveries[0].learn_aim_ref = "60054321".to_string();
    assert_eq!(failures(&learner), vec![on_aim("LearnAimRef_55", 1)]);

    learner.learning_deliveries[0] = restarted(learner.learning_deliveries[0].clone());
    assert_eq!(failures(&learner), vec![on_aim("LearnDelFAMType_40", 1)]);
}

#[test]
fn shared_sequence_numbers_keep_their_own_classification() {
    let mut learner = clean_learner("L1");
    learner.learning_deliveries = vec![
        restarted(delivery(1, "60012345", 35, date(2019, 9, 1))),
        delivery(1, "60054321", 35, date(2019, 9, 1)),
    ];
    assert_eq!(
        failures(&learner),
        vec![on_aim("LearnAimRef_55", 1), on_aim("LearnDelFAMType_40", 1)]
    );
}

#[test]
fn restart_with_earlier_delivery_of_same_aim_passes() {
    let mut learner = clean_learner("L1");
    learner.employment_statuses[0].date_emp_stat_app = date(2018, 1, 1);
    let mut withdrawn = delivery(1, "60012345", 35, date(2018, 9, 1));
    withdrawn.comp_status = CompletionStatus::Withdrawn;
    learner.learning_deliveries = vec![
        withdrawn,
        restarted(delivery(2, "60012345", 35, date(2019, 9, 1))),
    ];
    assert!(failures(&learner).is_empty());
}

#[test]
fn unknown_standard() {
    let mut learner = apprentice("L1");
    learner.learning_deliveries[0].std_code = Some(99);
    assert_eq!(failures(&learner), vec![on_aim("StdCode_01", 1)]);
}

#[test]
fn standard_not_valid_at_programme_start() {
    let mut learner = apprentice("L1");
    learner.learning_deliveries[0].learn_start_date = date(2017, 3, 1);
    let outcome = engine().evaluate_learner(&learner);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].rule_name, "StdCode_02");
    assert_eq!(
        outcome.failures[0].parameter("ProgrammeStartDate"),
        Some("01/03/2017")
    );
}

#[test]
fn apprenticeship_funding_without_apprenticeship_programme() {
    let mut learner = apprentice("L1");
    learner.learning_deliveries[0].prog_type = Some(ProgType::TRAINEESHIP);
    learner.learning_deliveries[0].std_code = None;
    assert_eq!(failures(&learner), vec![on_aim("ProgType_14", 1)]);
}

#[test]
fn programme_aim_without_negotiated_price() {
    let mut learner = apprentice("L1");
    learner.learning_deliveries[0].financial_records.clear();
    assert_eq!(failures(&learner), vec![on_aim("AFinType_13", 1)]);
}

#[test]
fn overlapping_programmes_on_same_standard() {
    let mut learner = apprentice("L1");
    learner
        .learning_deliveries
        .push(common::standard_programme(2, date(2020, 1, 1)));
    assert_eq!(
        failures(&learner),
        vec![on_aim("LearnStartDate_16", 1), on_aim("LearnStartDate_16", 2)]
    );
}

#[test]
fn esf_delivery_without_contract() {
    let mut learner = esf_learner("L1");
    learner.learning_deliveries[0].con_ref_number = None;
    assert_eq!(failures(&learner), vec![on_aim("ConRefNumber_01", 1)]);

    learner.learning_deliveries[0].con_ref_number = Some("ESF-9999".to_string());
    assert_eq!(failures(&learner), vec![on_aim("ConRefNumber_01", 1)]);
}

#[test]
fn only_latest_start_on_contract_is_checked_against_contract_dates() {
    let mut learner = esf_learner("L1");
    let mut late = learner.learning_deliveries[0].clone();
    late.aim_seq_number = 2;
    late.learn_start_date = date(2022, 2, 1);
    learner.learning_deliveries[0].learn_start_date = date(2018, 6, 1);
    learner.learning_deliveries.push(late);
    // The early delivery is also outside the window but is not the latest.
    assert_eq!(failures(&learner), vec![on_aim("ConRefNumber_03", 2)]);
}

#[test]
fn employment_status_not_permitted_by_contract() {
    let mut learner = esf_learner("L1");
    learner.employment_statuses[0] = common::status(10, date(2019, 8, 1));
    assert_eq!(failures(&learner), vec![on_aim("ConRefNumber_04", 1)]);
}

#[test]
fn unknown_partner() {
    let mut learner = clean_learner("L1");
    learner.learning_deliveries[0].partner_ukprn = Some(6);
    assert_eq!(failures(&learner), vec![on_aim("PartnerUKPRN_01", 1)]);

    learner.learning_deliveries[0].partner_ukprn = Some(3);
    assert!(failures(&learner).is_empty());
}
