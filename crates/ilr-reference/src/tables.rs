//! Raw reference tables as supplied by the ingestion side.
//!
//! These are plain rows with no indexing. [`ReferenceData::build`] turns
//! them into the read-only cache.
//!
//! [`ReferenceData::build`]: crate::ReferenceData::build

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ilr_model::{EmploymentStatusCode, Severity};

use crate::window::DateWindow;

/// Everything needed to build a [`ReferenceData`](crate::ReferenceData).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceTables {
    /// Qualification catalogue validity rows.
    #[serde(default)]
    pub qualifications: Vec<QualificationValidity>,
    /// Aims known to the catalogue even if they carry no validity rows.
    #[serde(default)]
    pub aim_refs: Vec<String>,
    #[serde(default)]
    pub standards: Vec<StandardValidity>,
    #[serde(default)]
    pub contracts: Vec<ContractAllocation>,
    /// UK provider reference numbers of registered organisations.
    #[serde(default)]
    pub organisations: Vec<u64>,
    #[serde(default)]
    pub postcodes: Vec<String>,
    /// Unique learner numbers issued by the learner register.
    #[serde(default)]
    pub ulns: Vec<u64>,
    /// Employer reference numbers.
    #[serde(default)]
    pub employers: Vec<u64>,
    #[serde(default)]
    pub rules: Vec<RuleMetadata>,
}

impl ReferenceTables {
    /// Append rule table rows (e.g. loaded from a separate CSV).
    #[must_use]
    pub fn with_rule_table(mut self, rules: Vec<RuleMetadata>) -> Self {
        self.rules.extend(rules);
        self
    }
}

/// One validity row from the qualification catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationValidity {
    pub learn_aim_ref: String,
    /// Validity category label (e.g. `ADULT_SKILLS`).
    pub category: String,
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl QualificationValidity {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }
}

/// One validity row for an apprenticeship standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardValidity {
    pub std_code: u32,
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl StandardValidity {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }
}

/// A funding contract allocation with its eligibility sub-rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAllocation {
    pub contract_ref: String,
    /// Provider holding the contract.
    #[serde(default)]
    pub ukprn: Option<u64>,
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Employment statuses eligible under this contract; empty means any.
    #[serde(default)]
    pub permitted_emp_stats: Vec<EmploymentStatusCode>,
    /// Sector codes eligible under this contract; empty means any.
    #[serde(default)]
    pub permitted_sector_codes: Vec<String>,
}

impl ContractAllocation {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }

    pub fn permits_emp_stat(&self, emp_stat: EmploymentStatusCode) -> bool {
        self.permitted_emp_stats.is_empty() || self.permitted_emp_stats.contains(&emp_stat)
    }

    pub fn permits_sector(&self, sector_code: &str) -> bool {
        self.permitted_sector_codes.is_empty()
            || self
                .permitted_sector_codes
                .iter()
                .any(|code| code.trim().eq_ignore_ascii_case(sector_code.trim()))
    }
}

/// Severity and message template for one rule name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub rule_name: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Message template; `{Name}` placeholders refer to failure parameters.
    #[serde(default)]
    pub message: String,
}
