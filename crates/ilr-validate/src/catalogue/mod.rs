//! The shipped rule catalogue.
//!
//! Each rule is one table row: a name, a one-line description, and a
//! [`RuleCheck`] pairing a failure predicate with a parameter builder.
//! Severities and message templates live in the reference rule table, not
//! here.

mod delivery;
mod learner;

use std::fmt::Display;

use chrono::NaiveDate;

use crate::rule::{DeclarativeRule, RuleCheck};

/// Date format used in failure parameters.
const PARAMETER_DATE_FORMAT: &str = "%d/%m/%Y";

fn format_date(date: NaiveDate) -> String {
    date.format(PARAMETER_DATE_FORMAT).to_string()
}

fn format_optional<T: Display>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// All catalogue rules, in catalogue order.
pub fn standard_rules() -> Vec<DeclarativeRule> {
    vec![
        DeclarativeRule::new(
            "ULN_03",
            "ULN is not on the learner register",
            RuleCheck::Learner {
                fails: learner::uln_unknown,
                parameters: learner::uln_parameters,
            },
        ),
        DeclarativeRule::new(
            "Postcode_14",
            "Prior postcode is not a known postcode",
            RuleCheck::Learner {
                fails: learner::postcode_unknown,
                parameters: learner::postcode_parameters,
            },
        ),
        DeclarativeRule::new(
            "DateOfBirth_48",
            "Adult skills learner is under 19 at the start of a non-apprenticeship aim",
            RuleCheck::Delivery {
                fails: delivery::adult_skills_learner_under_19,
                parameters: delivery::date_of_birth_parameters,
            },
        ),
        DeclarativeRule::new(
            "EmpStat_01",
            "No employment status applies at the start of an adult skills or apprenticeship aim",
            RuleCheck::Delivery {
                fails: delivery::employment_status_missing_at_start,
                parameters: delivery::start_and_fund_model_parameters,
            },
        ),
        DeclarativeRule::new(
            "EmpId_01",
            "Employer identifier is not a known employer",
            RuleCheck::EmploymentStatus {
                fails: learner::employer_unknown,
                parameters: learner::employer_parameters,
            },
        ),
        DeclarativeRule::new(
            "LearnAimRef_01",
            "Learning aim reference is not in the qualification catalogue",
            RuleCheck::Delivery {
                fails: delivery::aim_unknown,
                parameters: delivery::aim_parameters,
            },
        ),
        DeclarativeRule::new(
            "LearnAimRef_55",
            "Learning aim is not valid for its funding category on the start date",
            RuleCheck::Delivery {
                fails: delivery::aim_not_valid_for_category,
                parameters: delivery::category_parameters,
            },
        ),
        DeclarativeRule::new(
            "StdCode_01",
            "Standard code is not a known standard",
            RuleCheck::Delivery {
                fails: delivery::standard_unknown,
                parameters: delivery::standard_parameters,
            },
        ),
        DeclarativeRule::new(
            "StdCode_02",
            "Standard is not valid on the standard programme start date",
            RuleCheck::Delivery {
                fails: delivery::standard_not_valid_at_programme_start,
                parameters: delivery::programme_start_parameters,
            },
        ),
        DeclarativeRule::new(
            "ProgType_14",
            "Apprenticeship funded aim does not have an apprenticeship programme type",
            RuleCheck::Delivery {
                fails: delivery::apprenticeship_without_programme_type,
                parameters: delivery::programme_type_parameters,
            },
        ),
        DeclarativeRule::new(
            "ConRefNumber_01",
            "ESF funded aim has no known contract reference",
            RuleCheck::Delivery {
                fails: delivery::esf_contract_missing,
                parameters: delivery::contract_parameters,
            },
        ),
        DeclarativeRule::new(
            "ConRefNumber_03",
            "Latest start on a contract falls outside the contract dates",
            RuleCheck::Delivery {
                fails: delivery::latest_start_outside_contract,
                parameters: delivery::contract_start_parameters,
            },
        ),
        DeclarativeRule::new(
            "ConRefNumber_04",
            "Employment status at start is not permitted by the contract",
            RuleCheck::Delivery {
                fails: delivery::employment_status_not_permitted,
                parameters: delivery::contract_employment_parameters,
            },
        ),
        DeclarativeRule::new(
            "PartnerUKPRN_01",
            "Partner UKPRN is not a known organisation",
            RuleCheck::Delivery {
                fails: delivery::partner_unknown,
                parameters: delivery::partner_parameters,
            },
        ),
        DeclarativeRule::new(
            "LearnDelFAMType_40",
            "Restart indicated but no earlier delivery of the same aim exists",
            RuleCheck::Delivery {
                fails: delivery::restart_without_earlier_aim,
                parameters: delivery::restart_parameters,
            },
        ),
        DeclarativeRule::new(
            "LearnStartDate_16",
            "Standard programme aim overlaps another programme aim on the same standard",
            RuleCheck::Delivery {
                fails: delivery::overlapping_standard_programme,
                parameters: delivery::overlap_parameters,
            },
        ),
        DeclarativeRule::new(
            "AFinType_13",
            "Apprenticeship programme aim has no total negotiated price record",
            RuleCheck::Delivery {
                fails: delivery::programme_aim_without_price,
                parameters: delivery::aim_type_parameters,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_dates_use_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2019, 8, 1).expect("date");
        assert_eq!(format_date(date), "01/08/2019");
        assert_eq!(format_optional_date(None), "");
        assert_eq!(format_optional(Some(25)), "25");
    }
}
