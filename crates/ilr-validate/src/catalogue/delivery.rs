//! Learning-delivery rules.

use ilr_model::{AimType, ErrorParameter, FundModel, LearningDelivery, fam};

use super::{format_date, format_optional, format_optional_date};
use crate::classify::ADULT_AGE;
use crate::derived;
use crate::rule::LearnerContext;

fn start_date(delivery: &LearningDelivery) -> ErrorParameter {
    ErrorParameter::new("LearnStartDate", format_date(delivery.learn_start_date))
}

fn fund_model(delivery: &LearningDelivery) -> ErrorParameter {
    ErrorParameter::new("FundModel", delivery.fund_model)
}

fn con_ref(delivery: &LearningDelivery) -> ErrorParameter {
    ErrorParameter::new(
        "ConRefNumber",
        delivery.con_ref_number.as_deref().unwrap_or_default(),
    )
}

fn known_contract_ref(delivery: &LearningDelivery) -> Option<&str> {
    delivery
        .con_ref_number
        .as_deref()
        .filter(|con_ref| !con_ref.trim().is_empty())
}

// DateOfBirth_48

pub(super) fn adult_skills_learner_under_19(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    delivery.fund_model == FundModel::AdultSkills
        && !derived::is_apprenticeship(delivery.prog_type)
        && derived::age_at(ctx.learner.date_of_birth, delivery.learn_start_date)
            .is_some_and(|age| age < ADULT_AGE)
}

pub(super) fn date_of_birth_parameters(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![
        ErrorParameter::new(
            "DateOfBirth",
            format_optional_date(ctx.learner.date_of_birth),
        ),
        start_date(delivery),
        fund_model(delivery),
    ]
}

// EmpStat_01

pub(super) fn employment_status_missing_at_start(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    matches!(
        delivery.fund_model,
        FundModel::AdultSkills | FundModel::Apprenticeships
    ) && derived::qualifying_employment_status(
        &ctx.learner.employment_statuses,
        delivery.learn_start_date,
    )
    .is_none()
}

pub(super) fn start_and_fund_model_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![start_date(delivery), fund_model(delivery)]
}

// LearnAimRef_01

pub(super) fn aim_unknown(ctx: &LearnerContext<'_>, delivery: &LearningDelivery) -> bool {
    !ctx.reference.aim_exists(&delivery.learn_aim_ref)
}

pub(super) fn aim_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![ErrorParameter::new("LearnAimRef", &delivery.learn_aim_ref)]
}

// LearnAimRef_55

pub(super) fn aim_not_valid_for_category(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    let Some(classification) = ctx.facts.classification(delivery) else {
        return false;
    };
    let Some(category) = classification.category else {
        return false;
    };
    classification.qualifying
        && !ctx.reference.aim_valid_on(
            &delivery.learn_aim_ref,
            category.label(),
            delivery.learn_start_date,
        )
}

pub(super) fn category_parameters(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    let category = ctx
        .facts
        .classification(delivery)
        .and_then(|classification| classification.category)
        .map(|category| category.label())
        .unwrap_or_default();
    vec![
        ErrorParameter::new("LearnAimRef", &delivery.learn_aim_ref),
        ErrorParameter::new("Category", category),
        start_date(delivery),
    ]
}

// StdCode_01

pub(super) fn standard_unknown(ctx: &LearnerContext<'_>, delivery: &LearningDelivery) -> bool {
    delivery
        .std_code
        .is_some_and(|std_code| !ctx.reference.standard_exists(std_code))
}

pub(super) fn standard_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![ErrorParameter::new(
        "StdCode",
        format_optional(delivery.std_code),
    )]
}

// StdCode_02

pub(super) fn standard_not_valid_at_programme_start(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    let Some(std_code) = delivery.std_code else {
        return false;
    };
    if !ctx.reference.standard_exists(std_code) {
        return false;
    }
    ctx.facts
        .standard_programme_start(delivery)
        .is_some_and(|start| !ctx.reference.standard_valid_on(std_code, start))
}

pub(super) fn programme_start_parameters(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![
        ErrorParameter::new("StdCode", format_optional(delivery.std_code)),
        ErrorParameter::new(
            "ProgrammeStartDate",
            format_optional_date(ctx.facts.standard_programme_start(delivery)),
        ),
    ]
}

// ProgType_14

pub(super) fn apprenticeship_without_programme_type(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    delivery.fund_model == FundModel::Apprenticeships
        && !derived::is_apprenticeship(delivery.prog_type)
}

pub(super) fn programme_type_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![
        fund_model(delivery),
        ErrorParameter::new("ProgType", format_optional(delivery.prog_type)),
    ]
}

// ConRefNumber_01

pub(super) fn esf_contract_missing(ctx: &LearnerContext<'_>, delivery: &LearningDelivery) -> bool {
    delivery.fund_model == FundModel::EuropeanSocialFund
        && !known_contract_ref(delivery).is_some_and(|con_ref| ctx.reference.contract_exists(con_ref))
}

pub(super) fn contract_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![fund_model(delivery), con_ref(delivery)]
}

// ConRefNumber_03

/// Only the delivery carrying the contract's latest start is reported.
pub(super) fn latest_start_outside_contract(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    let Some(con_ref) = known_contract_ref(delivery) else {
        return false;
    };
    let Some(contract) = ctx.reference.contract(con_ref) else {
        return false;
    };
    ctx.facts.latest_start_for_contract(con_ref) == Some(delivery.learn_start_date)
        && !contract.window().contains(delivery.learn_start_date)
}

pub(super) fn contract_start_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![con_ref(delivery), start_date(delivery)]
}

// ConRefNumber_04

pub(super) fn employment_status_not_permitted(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    let Some(contract) = known_contract_ref(delivery).and_then(|con_ref| ctx.reference.contract(con_ref))
    else {
        return false;
    };
    if contract.permitted_emp_stats.is_empty() {
        return false;
    }
    derived::qualifying_employment_status(
        &ctx.learner.employment_statuses,
        delivery.learn_start_date,
    )
    .is_some_and(|status| !contract.permits_emp_stat(status.emp_stat))
}

pub(super) fn contract_employment_parameters(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    let emp_stat = derived::qualifying_employment_status(
        &ctx.learner.employment_statuses,
        delivery.learn_start_date,
    )
    .map(|status| status.emp_stat.code());
    vec![
        con_ref(delivery),
        ErrorParameter::new("EmpStat", format_optional(emp_stat)),
    ]
}

// PartnerUKPRN_01

pub(super) fn partner_unknown(ctx: &LearnerContext<'_>, delivery: &LearningDelivery) -> bool {
    delivery
        .partner_ukprn
        .is_some_and(|ukprn| !ctx.reference.organisation_exists(ukprn))
}

pub(super) fn partner_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![ErrorParameter::new(
        "PartnerUKPRN",
        format_optional(delivery.partner_ukprn),
    )]
}

// LearnDelFAMType_40

pub(super) fn restart_without_earlier_aim(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    derived::is_restart(delivery)
        && ctx
            .facts
            .earliest_start_for_aim(&delivery.learn_aim_ref)
            .is_none_or(|earliest| earliest >= delivery.learn_start_date)
}

pub(super) fn restart_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![
        ErrorParameter::new("LearnDelFAMType", fam::RESTART),
        ErrorParameter::new("LearnAimRef", &delivery.learn_aim_ref),
        start_date(delivery),
    ]
}

// LearnStartDate_16

pub(super) fn overlapping_standard_programme(
    ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    ctx.facts.overlaps_same_standard(delivery)
}

pub(super) fn overlap_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![
        ErrorParameter::new("StdCode", format_optional(delivery.std_code)),
        start_date(delivery),
        ErrorParameter::new(
            "LearnPlanEndDate",
            format_date(delivery.learn_planned_end_date),
        ),
    ]
}

// AFinType_13

pub(super) fn programme_aim_without_price(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> bool {
    delivery.fund_model == FundModel::Apprenticeships
        && delivery.aim_type == AimType::ProgrammeAim
        && !delivery
            .financial_records
            .iter()
            .any(|record| record.fin_type.eq_ignore_ascii_case(fam::TOTAL_NEGOTIATED_PRICE))
}

pub(super) fn aim_type_parameters(
    _ctx: &LearnerContext<'_>,
    delivery: &LearningDelivery,
) -> Vec<ErrorParameter> {
    vec![
        ErrorParameter::new("AimType", delivery.aim_type),
        fund_model(delivery),
    ]
}
