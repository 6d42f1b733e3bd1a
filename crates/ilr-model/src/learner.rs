//! Learner record graph.
//!
//! A [`Submission`] owns its learners; each [`Learner`] owns its learning
//! deliveries and employment statuses. The graph is read-only for the whole
//! of a validation run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::{AimType, CompletionStatus, EmploymentStatusCode, FundModel, ProgType};

/// One provider's submission: the materialized record graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    /// UK provider reference number of the submitting provider.
    #[serde(default)]
    pub ukprn: Option<u64>,
    #[serde(default)]
    pub learners: Vec<Learner>,
}

/// One person's submitted funding record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    /// Provider-assigned learner reference, unique within a submission.
    pub learn_ref_number: String,
    /// Unique learner number.
    #[serde(default)]
    pub uln: Option<u64>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Postcode of the learner's address prior to enrolment.
    #[serde(default)]
    pub postcode_prior: Option<String>,
    #[serde(default)]
    pub learning_deliveries: Vec<LearningDelivery>,
    #[serde(default)]
    pub employment_statuses: Vec<EmploymentStatus>,
}

impl Learner {
    pub fn new(learn_ref_number: impl Into<String>) -> Self {
        Self {
            learn_ref_number: learn_ref_number.into(),
            uln: None,
            date_of_birth: None,
            postcode_prior: None,
            learning_deliveries: Vec::new(),
            employment_statuses: Vec::new(),
        }
    }

    /// Find a delivery by aim sequence number.
    pub fn delivery(&self, aim_seq_number: u32) -> Option<&LearningDelivery> {
        self.learning_deliveries
            .iter()
            .find(|delivery| delivery.aim_seq_number == aim_seq_number)
    }
}

/// One funded learning aim instance within a learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningDelivery {
    pub aim_seq_number: u32,
    /// Learning aim reference (qualification catalogue code).
    pub learn_aim_ref: String,
    pub aim_type: AimType,
    #[serde(default)]
    pub prog_type: Option<ProgType>,
    #[serde(default)]
    pub fwork_code: Option<u32>,
    #[serde(default)]
    pub pway_code: Option<u32>,
    #[serde(default)]
    pub std_code: Option<u32>,
    pub fund_model: FundModel,
    pub learn_start_date: NaiveDate,
    pub learn_planned_end_date: NaiveDate,
    #[serde(default)]
    pub learn_act_end_date: Option<NaiveDate>,
    pub comp_status: CompletionStatus,
    #[serde(default)]
    pub fams: Vec<DeliveryFam>,
    #[serde(default)]
    pub financial_records: Vec<FinancialRecord>,
    /// Contract reference number.
    #[serde(default)]
    pub con_ref_number: Option<String>,
    /// Subcontracted or partnership UK provider reference number.
    #[serde(default)]
    pub partner_ukprn: Option<u64>,
}

impl LearningDelivery {
    /// Returns true if any marker of the given type carries the given code.
    pub fn has_fam(&self, fam_type: &str, fam_code: &str) -> bool {
        self.fams.iter().any(|fam| fam.matches(fam_type, fam_code))
    }

    /// Returns true if any marker of the given type is present.
    pub fn has_fam_type(&self, fam_type: &str) -> bool {
        self.fams
            .iter()
            .any(|fam| fam.fam_type.trim().eq_ignore_ascii_case(fam_type))
    }

    /// The last day of learning: actual end when known, otherwise planned end.
    pub fn effective_end_date(&self) -> NaiveDate {
        self.learn_act_end_date
            .unwrap_or(self.learn_planned_end_date)
    }
}

/// Delivery monitoring marker (FAM): type + code with an optional date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFam {
    pub fam_type: String,
    pub fam_code: String,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl DeliveryFam {
    pub fn new(fam_type: impl Into<String>, fam_code: impl Into<String>) -> Self {
        Self {
            fam_type: fam_type.into(),
            fam_code: fam_code.into(),
            date_from: None,
            date_to: None,
        }
    }

    /// Type and code comparison, case-insensitive and whitespace-tolerant.
    pub fn matches(&self, fam_type: &str, fam_code: &str) -> bool {
        self.fam_type.trim().eq_ignore_ascii_case(fam_type)
            && self.fam_code.trim().eq_ignore_ascii_case(fam_code)
    }

    /// Whether the marker applies on `date`; missing bounds are open.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| from <= date) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// Financial record attached to a learning delivery (e.g. negotiated price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub fin_type: String,
    pub fin_code: u32,
    pub fin_date: NaiveDate,
    pub fin_amount: i64,
}

/// Point-in-time employment record for a learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmploymentStatus {
    pub emp_stat: EmploymentStatusCode,
    /// Date from which the status applies.
    pub date_emp_stat_app: NaiveDate,
    /// Employer reference number.
    #[serde(default)]
    pub emp_id: Option<u64>,
    #[serde(default)]
    pub monitorings: Vec<EmploymentMonitoring>,
}

impl EmploymentStatus {
    pub fn has_monitoring_type(&self, esm_type: &str) -> bool {
        self.monitorings
            .iter()
            .any(|monitoring| monitoring.esm_type.trim().eq_ignore_ascii_case(esm_type))
    }
}

/// Employment status monitoring marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentMonitoring {
    pub esm_type: String,
    pub esm_code: u32,
}
