//! The read-only reference data cache.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use ilr_model::{CaseInsensitiveMap, normalize_postcode};

use crate::tables::{ContractAllocation, ReferenceTables, RuleMetadata};
use crate::window::{DateWindow, any_contains};

/// Validity windows for one aim, keyed by category.
#[derive(Debug, Clone, Default)]
struct AimValidity {
    by_category: CaseInsensitiveMap<Vec<DateWindow>>,
}

/// Immutable lookup tables for one validation run.
///
/// Built once with [`ReferenceData::build`] and then shared (typically via
/// `Arc`) by every component that needs it. Absent keys are a normal
/// outcome: existence checks return `false`, window lookups return an empty
/// slice and metadata lookups return `None`.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    aims: CaseInsensitiveMap<AimValidity>,
    standards: HashMap<u32, Vec<DateWindow>>,
    contracts: CaseInsensitiveMap<ContractAllocation>,
    organisations: HashSet<u64>,
    postcodes: HashSet<String>,
    ulns: HashSet<u64>,
    employers: HashSet<u64>,
    rules: CaseInsensitiveMap<RuleMetadata>,
}

/// Entry counts, for logging and CLI summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceSummary {
    pub aims: usize,
    pub standards: usize,
    pub contracts: usize,
    pub organisations: usize,
    pub postcodes: usize,
    pub ulns: usize,
    pub employers: usize,
    pub rules: usize,
}

impl ReferenceData {
    /// An empty cache: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index raw reference tables.
    ///
    /// Windows are sorted by start date per key. When a contract reference or
    /// rule name appears more than once, the first row wins.
    pub fn build(tables: ReferenceTables) -> Self {
        let ReferenceTables {
            qualifications,
            aim_refs,
            standards: standard_rows,
            contracts: contract_rows,
            organisations,
            postcodes,
            ulns,
            employers,
            rules: rule_rows,
        } = tables;

        let mut aims: CaseInsensitiveMap<AimValidity> = CaseInsensitiveMap::new();
        for aim_ref in &aim_refs {
            aims.entry_or_default(aim_ref);
        }
        for row in &qualifications {
            aims.entry_or_default(&row.learn_aim_ref)
                .by_category
                .entry_or_default(&row.category)
                .push(row.window());
        }
        for aim in aims.values_mut() {
            for windows in aim.by_category.values_mut() {
                windows.sort();
            }
        }

        let mut standards: HashMap<u32, Vec<DateWindow>> = HashMap::new();
        for row in &standard_rows {
            standards.entry(row.std_code).or_default().push(row.window());
        }
        for windows in standards.values_mut() {
            windows.sort();
        }

        let mut contracts = CaseInsensitiveMap::new();
        for contract in contract_rows {
            let key = contract.contract_ref.clone();
            contracts.insert_first(&key, contract);
        }

        let mut rules = CaseInsensitiveMap::new();
        for rule in rule_rows {
            let key = rule.rule_name.clone();
            if rules.contains(&key) {
                debug!(rule = %key, "duplicate rule table entry ignored");
                continue;
            }
            rules.insert_first(&key, rule);
        }

        let data = Self {
            aims,
            standards,
            contracts,
            organisations: organisations.into_iter().collect(),
            postcodes: postcodes
                .iter()
                .map(|postcode| normalize_postcode(postcode))
                .collect(),
            ulns: ulns.into_iter().collect(),
            employers: employers.into_iter().collect(),
            rules,
        };

        let summary = data.summary();
        info!(
            aims = summary.aims,
            standards = summary.standards,
            contracts = summary.contracts,
            organisations = summary.organisations,
            postcodes = summary.postcodes,
            ulns = summary.ulns,
            employers = summary.employers,
            rules = summary.rules,
            "reference data built"
        );
        data
    }

    pub fn summary(&self) -> ReferenceSummary {
        ReferenceSummary {
            aims: self.aims.len(),
            standards: self.standards.len(),
            contracts: self.contracts.len(),
            organisations: self.organisations.len(),
            postcodes: self.postcodes.len(),
            ulns: self.ulns.len(),
            employers: self.employers.len(),
            rules: self.rules.len(),
        }
    }

    // Qualification catalogue

    pub fn aim_exists(&self, learn_aim_ref: &str) -> bool {
        self.aims.contains(learn_aim_ref)
    }

    /// Windows for (aim, category), ordered by start date.
    pub fn qualification_windows(&self, learn_aim_ref: &str, category: &str) -> &[DateWindow] {
        self.aims
            .get(learn_aim_ref)
            .and_then(|aim| aim.by_category.get(category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn aim_valid_on(&self, learn_aim_ref: &str, category: &str, date: NaiveDate) -> bool {
        any_contains(self.qualification_windows(learn_aim_ref, category), date)
    }

    // Standards

    pub fn standard_exists(&self, std_code: u32) -> bool {
        self.standards.contains_key(&std_code)
    }

    /// Windows for a standard, ordered by start date.
    pub fn standard_windows(&self, std_code: u32) -> &[DateWindow] {
        self.standards
            .get(&std_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn standard_valid_on(&self, std_code: u32, date: NaiveDate) -> bool {
        any_contains(self.standard_windows(std_code), date)
    }

    // Contracts

    pub fn contract(&self, contract_ref: &str) -> Option<&ContractAllocation> {
        self.contracts.get(contract_ref)
    }

    pub fn contract_exists(&self, contract_ref: &str) -> bool {
        self.contracts.contains(contract_ref)
    }

    // Existence sets

    pub fn organisation_exists(&self, ukprn: u64) -> bool {
        self.organisations.contains(&ukprn)
    }

    pub fn postcode_exists(&self, postcode: &str) -> bool {
        self.postcodes.contains(&normalize_postcode(postcode))
    }

    pub fn uln_exists(&self, uln: u64) -> bool {
        self.ulns.contains(&uln)
    }

    pub fn employer_exists(&self, emp_id: u64) -> bool {
        self.employers.contains(&emp_id)
    }

    // Rule table

    /// Severity and message template by rule name (case-insensitive).
    pub fn rule_metadata(&self, rule_name: &str) -> Option<&RuleMetadata> {
        self.rules.get(rule_name)
    }
}
