//! Funding category classification.
//!
//! A learning delivery is classified by first selecting a branch from its
//! funding model, then walking that branch's ordered predicates until one
//! names a category. The category's eligibility predicate decides whether
//! the delivery qualifies, with a restart marker overriding everything.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use ilr_model::{FundModel, Learner, LearningDelivery, ProgType};
use ilr_reference::ReferenceData;

use crate::derived;

/// Age from which adult-only categories apply.
pub const ADULT_AGE: u32 = 19;

/// Funding categories in decision-tree order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FundingCategory {
    Custody,
    Unemployed,
    AdultSkills,
    ApprenticeshipAny,
    AdvancedLearnerLoan,
    SixteenToNineteen,
    CommunityLearning,
    EuropeanSocialFund,
    Any,
}

impl FundingCategory {
    pub const ALL: [FundingCategory; 9] = [
        FundingCategory::Custody,
        FundingCategory::Unemployed,
        FundingCategory::AdultSkills,
        FundingCategory::ApprenticeshipAny,
        FundingCategory::AdvancedLearnerLoan,
        FundingCategory::SixteenToNineteen,
        FundingCategory::CommunityLearning,
        FundingCategory::EuropeanSocialFund,
        FundingCategory::Any,
    ];

    /// Label used to key qualification validity windows.
    pub fn label(self) -> &'static str {
        match self {
            FundingCategory::Custody => "CUSTODY",
            FundingCategory::Unemployed => "UNEMPLOYED",
            FundingCategory::AdultSkills => "ADULT_SKILLS",
            FundingCategory::ApprenticeshipAny => "APPRENTICESHIP_ANY",
            FundingCategory::AdvancedLearnerLoan => "ADVANCED_LEARNER_LOAN",
            FundingCategory::SixteenToNineteen => "16_19",
            FundingCategory::CommunityLearning => "COMMUNITY_LEARNING",
            FundingCategory::EuropeanSocialFund => "ESF",
            FundingCategory::Any => "ANY",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for FundingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying one delivery.
///
/// Exactly one of `category` and `out_of_scope` is set. An out-of-scope
/// delivery never qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Option<FundingCategory>,
    pub qualifying: bool,
    pub out_of_scope: bool,
}

impl Classification {
    pub fn in_category(category: FundingCategory, qualifying: bool) -> Self {
        Self {
            category: Some(category),
            qualifying,
            out_of_scope: false,
        }
    }

    pub fn out_of_scope() -> Self {
        Self {
            category: None,
            qualifying: false,
            out_of_scope: true,
        }
    }
}

/// Classifies deliveries into funding categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryClassifier;

impl CategoryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `delivery`, deriving its standard programme start from the
    /// learner's other deliveries.
    pub fn classify(
        &self,
        delivery: &LearningDelivery,
        learner: &Learner,
        reference: &ReferenceData,
    ) -> Classification {
        let programme_start =
            derived::standard_programme_start(delivery, &learner.learning_deliveries);
        self.classify_with_start(delivery, learner, reference, programme_start)
    }

    /// Classify `delivery` with an already-derived standard programme start.
    pub fn classify_with_start(
        &self,
        delivery: &LearningDelivery,
        learner: &Learner,
        reference: &ReferenceData,
        programme_start: Option<NaiveDate>,
    ) -> Classification {
        let Some(category) = select_category(delivery, learner) else {
            warn!(
                fund_model = delivery.fund_model.code(),
                aim_seq_number = delivery.aim_seq_number,
                "delivery funding model is outside every category branch"
            );
            return Classification::out_of_scope();
        };

        let qualifying = !derived::is_restart(delivery)
            && is_eligible(category, delivery, learner, reference, programme_start);
        Classification::in_category(category, qualifying)
    }
}

fn select_category(delivery: &LearningDelivery, learner: &Learner) -> Option<FundingCategory> {
    let category = match delivery.fund_model {
        FundModel::AdultSkills => {
            if derived::is_custody(delivery) {
                FundingCategory::Custody
            } else if unemployed_at_start(delivery, learner) {
                FundingCategory::Unemployed
            } else if derived::is_apprenticeship(delivery.prog_type) {
                apprenticeship_path(delivery)
            } else {
                FundingCategory::AdultSkills
            }
        }
        FundModel::Apprenticeships => apprenticeship_path(delivery),
        FundModel::OtherAdult => {
            if derived::is_apprenticeship(delivery.prog_type) {
                apprenticeship_path(delivery)
            } else {
                FundingCategory::Any
            }
        }
        FundModel::NonFunded => {
            if derived::has_learner_loan(delivery) {
                FundingCategory::AdvancedLearnerLoan
            } else {
                FundingCategory::Any
            }
        }
        FundModel::SixteenToNineteen | FundModel::OtherSixteenToNineteen => {
            FundingCategory::SixteenToNineteen
        }
        FundModel::CommunityLearning => FundingCategory::CommunityLearning,
        FundModel::EuropeanSocialFund => FundingCategory::EuropeanSocialFund,
        FundModel::Other(_) => return None,
    };
    Some(category)
}

fn apprenticeship_path(delivery: &LearningDelivery) -> FundingCategory {
    if derived::has_learner_loan(delivery) {
        FundingCategory::AdvancedLearnerLoan
    } else {
        FundingCategory::ApprenticeshipAny
    }
}

fn unemployed_at_start(delivery: &LearningDelivery, learner: &Learner) -> bool {
    derived::qualifying_employment_status(&learner.employment_statuses, delivery.learn_start_date)
        .is_some_and(derived::is_on_benefits)
}

fn is_adult_at_start(delivery: &LearningDelivery, learner: &Learner) -> bool {
    derived::age_at(learner.date_of_birth, delivery.learn_start_date)
        .is_some_and(|age| age >= ADULT_AGE)
}

fn is_eligible(
    category: FundingCategory,
    delivery: &LearningDelivery,
    learner: &Learner,
    reference: &ReferenceData,
    programme_start: Option<NaiveDate>,
) -> bool {
    match category {
        FundingCategory::Custody | FundingCategory::AdvancedLearnerLoan => {
            is_adult_at_start(delivery, learner)
        }
        FundingCategory::Unemployed => derived::qualifying_employment_status(
            &learner.employment_statuses,
            delivery.learn_start_date,
        )
        .is_some_and(|status| status.emp_stat.is_not_in_paid_employment()),
        FundingCategory::AdultSkills => !derived::is_apprenticeship(delivery.prog_type),
        FundingCategory::ApprenticeshipAny => {
            if delivery.prog_type == Some(ProgType::APPRENTICESHIP_STANDARD) {
                standard_is_valid(delivery, reference, programme_start)
            } else {
                delivery.fwork_code.is_some()
            }
        }
        FundingCategory::SixteenToNineteen => {
            derived::age_at_academic_year_start(learner.date_of_birth, delivery.learn_start_date)
                .is_some_and(|age| (16..=18).contains(&age))
        }
        FundingCategory::CommunityLearning => derived::has_source_of_funding(delivery),
        FundingCategory::EuropeanSocialFund => delivery
            .con_ref_number
            .as_deref()
            .is_some_and(|con_ref| reference.contract_exists(con_ref)),
        FundingCategory::Any => true,
    }
}

fn standard_is_valid(
    delivery: &LearningDelivery,
    reference: &ReferenceData,
    programme_start: Option<NaiveDate>,
) -> bool {
    let Some(std_code) = delivery.std_code else {
        return false;
    };
    let start = programme_start.unwrap_or(delivery.learn_start_date);
    reference.standard_valid_on(std_code, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parse() {
        for category in FundingCategory::ALL {
            assert_eq!(FundingCategory::parse(category.label()), Some(category));
        }
        assert_eq!(
            FundingCategory::parse(" adult_skills "),
            Some(FundingCategory::AdultSkills)
        );
        assert_eq!(FundingCategory::parse("TRAINEESHIP"), None);
    }

    #[test]
    fn out_of_scope_never_qualifies() {
        let classification = Classification::out_of_scope();
        assert!(classification.category.is_none());
        assert!(!classification.qualifying);
    }
}
