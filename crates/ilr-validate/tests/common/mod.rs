#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use ilr_model::{
    AimType, CompletionStatus, DeliveryFam, EmploymentMonitoring, EmploymentStatus,
    EmploymentStatusCode, FinancialRecord, FundModel, Learner, LearningDelivery, ProgType,
    Severity, fam,
};
use ilr_reference::{
    ContractAllocation, QualificationValidity, ReferenceData, ReferenceTables, RuleMetadata,
    StandardValidity,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn delivery(
    aim_seq_number: u32,
    learn_aim_ref: &str,
    fund_model: u32,
    start: NaiveDate,
) -> LearningDelivery {
    LearningDelivery {
        aim_seq_number,
        learn_aim_ref: learn_aim_ref.to_string(),
        aim_type: AimType::Standalone,
        prog_type: None,
        fwork_code: None,
        pway_code: None,
        std_code: None,
        fund_model: FundModel::from(fund_model),
        learn_start_date: start,
        learn_planned_end_date: start + chrono::Days::new(300),
        learn_act_end_date: None,
        comp_status: CompletionStatus::Continuing,
        fams: Vec::new(),
        financial_records: Vec::new(),
        con_ref_number: None,
        partner_ukprn: None,
    }
}

/// Programme aim of apprenticeship standard 17 with a negotiated price.
pub fn standard_programme(aim_seq_number: u32, start: NaiveDate) -> LearningDelivery {
    let mut programme = delivery(aim_seq_number, "ZPROG001", 36, start);
    programme.aim_type = AimType::ProgrammeAim;
    programme.prog_type = Some(ProgType::APPRENTICESHIP_STANDARD);
    programme.std_code = Some(17);
    programme.financial_records.push(FinancialRecord {
        fin_type: fam::TOTAL_NEGOTIATED_PRICE.to_string(),
        fin_code: 1,
        fin_date: start,
        fin_amount: 9_000,
    });
    programme
}

pub fn restarted(mut delivery: LearningDelivery) -> LearningDelivery {
    delivery
        .fams
        .push(DeliveryFam::new(fam::RESTART, fam::RESTART_CODE));
    delivery
}

pub fn with_fam(mut delivery: LearningDelivery, fam_type: &str, fam_code: &str) -> LearningDelivery {
    delivery.fams.push(DeliveryFam::new(fam_type, fam_code));
    delivery
}

pub fn status(code: u32, from: NaiveDate) -> EmploymentStatus {
    EmploymentStatus {
        emp_stat: EmploymentStatusCode::from(code),
        date_emp_stat_app: from,
        emp_id: None,
        monitorings: Vec::new(),
    }
}

pub fn on_benefits(mut status: EmploymentStatus) -> EmploymentStatus {
    status.monitorings.push(EmploymentMonitoring {
        esm_type: fam::BENEFIT_STATUS_INDICATOR.to_string(),
        esm_code: 1,
    });
    status
}

/// A learner no catalogue rule fails against.
pub fn clean_learner(learn_ref_number: &str) -> Learner {
    let mut learner = Learner::new(learn_ref_number);
    learner.uln = Some(1_000_000_042);
    learner.date_of_birth = Some(date(1990, 1, 1));
    learner.postcode_prior = Some("cv1 2wt".to_string());
    let mut employed = status(10, date(2019, 8, 1));
    employed.emp_id = Some(154_549_452);
    learner.employment_statuses.push(employed);
    learner
        .learning_deliveries
        .push(delivery(1, "60012345", 35, date(2019, 9, 1)));
    learner
}

/// An apprenticeship standard learner no catalogue rule fails against.
pub fn apprentice(learn_ref_number: &str) -> Learner {
    let mut learner = clean_learner(learn_ref_number);
    learner.employment_statuses[0].date_emp_stat_app = date(2016, 1, 1);
    learner.learning_deliveries = vec![standard_programme(1, date(2019, 9, 1))];
    learner
}

/// An ESF learner no catalogue rule fails against.
pub fn esf_learner(learn_ref_number: &str) -> Learner {
    let mut learner = clean_learner(learn_ref_number);
    learner.employment_statuses = vec![status(11, date(2019, 8, 1))];
    let mut esf = delivery(1, "60012345", 70, date(2019, 9, 1));
    esf.con_ref_number = Some("ESF-1234".to_string());
    learner.learning_deliveries = vec![esf];
    learner
}

fn qualification(aim: &str, category: &str, start: NaiveDate, end: Option<NaiveDate>) -> QualificationValidity {
    QualificationValidity {
        learn_aim_ref: aim.to_string(),
        category: category.to_string(),
        start,
        end,
    }
}

fn rule(name: &str, severity: Severity, message: &str) -> RuleMetadata {
    RuleMetadata {
        rule_name: name.to_string(),
        severity: Some(severity),
        message: message.to_string(),
    }
}

pub fn tables() -> ReferenceTables {
    ReferenceTables {
        qualifications: vec![
            qualification("60012345", "ADULT_SKILLS", date(2018, 1, 1), None),
            qualification("60012345", "ESF", date(2018, 1, 1), None),
            qualification("60054321", "ADULT_SKILLS", date(2015, 8, 1), Some(date(2017, 7, 31))),
            qualification("ZPROG001", "APPRENTICESHIP_ANY", date(2017, 5, 1), None),
        ],
        aim_refs: Vec::new(),
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
            permitted_emp_stats: vec![
                EmploymentStatusCode::NotEmployedLookingForWork,
                EmploymentStatusCode::NotEmployedNotLooking,
            ],
            permitted_sector_codes: Vec::new(),
        }],
        organisations: (1..=5).chain([10_000_001]).collect(),
        postcodes: vec!["CV1 2WT".to_string()],
        ulns: vec![1_000_000_042],
        employers: vec![154_549_452],
        rules: vec![
            rule("ULN_03", Severity::Error, "The ULN {ULN} is not on the learner register"),
            rule("EmpStat_01", Severity::Error, "No employment status on {LearnStartDate}"),
            rule("LearnAimRef_01", Severity::Error, "Unknown learning aim {LearnAimRef}"),
            rule("DateOfBirth_48", Severity::Warning, "Learner born {DateOfBirth} is under 19"),
        ],
    }
}

pub fn reference() -> Arc<ReferenceData> {
    Arc::new(ReferenceData::build(tables()))
}
