//! Derived facts shared across rules.
//!
//! Every function here is pure: it reads the record graph (and sometimes the
//! reference cache) and returns a value. Missing optional data yields `None`
//! or `false`, never a panic; the calling rule decides what absence means.
//!
//! Scans over a learner's deliveries are single-pass and do not assume any
//! input order. Rules that need a collection-wide fact for every delivery
//! read it from [`LearnerFacts`], which computes each fact once per learner.

use std::collections::{HashMap, HashSet};
use std::{mem, ptr};

use chrono::{Datelike, NaiveDate};

use ilr_model::{
    AimType, CaseInsensitiveMap, CompletionStatus, EmploymentStatus, Learner, LearningDelivery,
    ProgType, fam,
};
use ilr_reference::ReferenceData;

use crate::classify::{CategoryClassifier, Classification};

const APPRENTICESHIP_PROG_TYPES: [ProgType; 7] = [
    ProgType::ADVANCED_LEVEL_APPRENTICESHIP,
    ProgType::INTERMEDIATE_LEVEL_APPRENTICESHIP,
    ProgType::HIGHER_APPRENTICESHIP_LEVEL_4,
    ProgType::HIGHER_APPRENTICESHIP_LEVEL_5,
    ProgType::HIGHER_APPRENTICESHIP_LEVEL_6,
    ProgType::HIGHER_APPRENTICESHIP_LEVEL_7,
    ProgType::APPRENTICESHIP_STANDARD,
];

/// Whether a programme type denotes an apprenticeship. Absent ⇒ false.
pub fn is_apprenticeship(prog_type: Option<ProgType>) -> bool {
    prog_type.is_some_and(|code| APPRENTICESHIP_PROG_TYPES.contains(&code))
}

pub fn is_restart(delivery: &LearningDelivery) -> bool {
    delivery.has_fam(fam::RESTART, fam::RESTART_CODE)
}

/// OLASS: learning delivered to offenders in custody.
pub fn is_custody(delivery: &LearningDelivery) -> bool {
    delivery.has_fam(fam::LEARNING_DELIVERY_MONITORING, fam::LDM_CUSTODY)
}

pub fn has_learner_loan(delivery: &LearningDelivery) -> bool {
    delivery.has_fam(
        fam::ADVANCED_LEARNER_LOAN,
        fam::ADVANCED_LEARNER_LOAN_CODE,
    )
}

pub fn has_source_of_funding(delivery: &LearningDelivery) -> bool {
    delivery.has_fam_type(fam::SOURCE_OF_FUNDING)
}

pub fn is_on_benefits(status: &EmploymentStatus) -> bool {
    status.has_monitoring_type(fam::BENEFIT_STATUS_INDICATOR)
}

/// Programme or component aim of a standard apprenticeship with a standard code.
pub fn is_standard_apprenticeship(delivery: &LearningDelivery) -> bool {
    delivery.prog_type == Some(ProgType::APPRENTICESHIP_STANDARD)
        && delivery.std_code.is_some()
        && matches!(
            delivery.aim_type,
            AimType::ProgrammeAim | AimType::ComponentAim
        )
}

fn is_standard_programme_aim(delivery: &LearningDelivery) -> bool {
    delivery.aim_type == AimType::ProgrammeAim && is_standard_apprenticeship(delivery)
}

/// Latest start date among deliveries on `con_ref` whose completion status
/// satisfies `completion`. Contract references compare case-insensitively.
pub fn latest_start_for_contract<F>(
    deliveries: &[LearningDelivery],
    con_ref: &str,
    completion: F,
) -> Option<NaiveDate>
where
    F: Fn(CompletionStatus) -> bool,
{
    contract_starts(deliveries, con_ref, completion).max()
}

/// Earliest start date among deliveries on `con_ref` whose completion
/// status satisfies `completion`.
pub fn earliest_start_for_contract<F>(
    deliveries: &[LearningDelivery],
    con_ref: &str,
    completion: F,
) -> Option<NaiveDate>
where
    F: Fn(CompletionStatus) -> bool,
{
    contract_starts(deliveries, con_ref, completion).min()
}

fn contract_starts<'a, F>(
    deliveries: &'a [LearningDelivery],
    con_ref: &'a str,
    completion: F,
) -> impl Iterator<Item = NaiveDate> + 'a
where
    F: Fn(CompletionStatus) -> bool + 'a,
{
    let wanted = con_ref.trim();
    deliveries
        .iter()
        .filter(move |delivery| {
            delivery
                .con_ref_number
                .as_deref()
                .is_some_and(|reference| reference.trim().eq_ignore_ascii_case(wanted))
        })
        .filter(move |delivery| completion(delivery.comp_status))
        .map(|delivery| delivery.learn_start_date)
}

/// Latest start date per contract reference, in one pass.
pub fn latest_starts_by_contract<F>(
    deliveries: &[LearningDelivery],
    completion: F,
) -> CaseInsensitiveMap<NaiveDate>
where
    F: Fn(CompletionStatus) -> bool,
{
    let mut latest = CaseInsensitiveMap::new();
    for delivery in deliveries {
        let Some(con_ref) = delivery.con_ref_number.as_deref() else {
            continue;
        };
        if con_ref.trim().is_empty() || !completion(delivery.comp_status) {
            continue;
        }
        keep_extreme(&mut latest, con_ref, delivery.learn_start_date, |new, old| new > old);
    }
    latest
}

/// Earliest start date per learning aim reference, in one pass.
pub fn earliest_starts_by_aim(deliveries: &[LearningDelivery]) -> CaseInsensitiveMap<NaiveDate> {
    let mut earliest = CaseInsensitiveMap::new();
    for delivery in deliveries {
        keep_extreme(
            &mut earliest,
            &delivery.learn_aim_ref,
            delivery.learn_start_date,
            |new, old| new < old,
        );
    }
    earliest
}

fn keep_extreme(
    map: &mut CaseInsensitiveMap<NaiveDate>,
    key: &str,
    date: NaiveDate,
    replaces: impl Fn(NaiveDate, NaiveDate) -> bool,
) {
    match map.get_mut(key) {
        Some(current) if replaces(date, *current) => *current = date,
        Some(_) => {}
        None => map.insert(key, date),
    }
}

pub fn earliest_start(deliveries: &[LearningDelivery]) -> Option<NaiveDate> {
    deliveries
        .iter()
        .map(|delivery| delivery.learn_start_date)
        .min()
}

pub fn latest_start(deliveries: &[LearningDelivery]) -> Option<NaiveDate> {
    deliveries
        .iter()
        .map(|delivery| delivery.learn_start_date)
        .max()
}

/// Start of the standard apprenticeship programme `delivery` belongs to.
///
/// `None` unless the delivery is a programme or component aim of a standard
/// apprenticeship. The programme start is the earliest start among the
/// standard's programme aims that are not restarts; when every programme
/// aim is a restart, the earliest of them; when there is no programme aim,
/// the delivery's own start date.
pub fn standard_programme_start(
    delivery: &LearningDelivery,
    deliveries: &[LearningDelivery],
) -> Option<NaiveDate> {
    if !is_standard_apprenticeship(delivery) {
        return None;
    }
    let std_code = delivery.std_code?;
    let mut starts = StandardStart::default();
    for candidate in deliveries {
        if is_standard_programme_aim(candidate) && candidate.std_code == Some(std_code) {
            starts.observe(candidate);
        }
    }
    Some(starts.resolve().unwrap_or(delivery.learn_start_date))
}

/// Programme start per standard code, in one pass.
pub fn standard_programme_starts(deliveries: &[LearningDelivery]) -> HashMap<u32, NaiveDate> {
    let mut by_standard: HashMap<u32, StandardStart> = HashMap::new();
    for delivery in deliveries {
        if !is_standard_programme_aim(delivery) {
            continue;
        }
        if let Some(std_code) = delivery.std_code {
            by_standard.entry(std_code).or_default().observe(delivery);
        }
    }
    by_standard
        .into_iter()
        .filter_map(|(std_code, starts)| starts.resolve().map(|start| (std_code, start)))
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct StandardStart {
    earliest_original: Option<NaiveDate>,
    earliest_any: Option<NaiveDate>,
}

impl StandardStart {
    fn observe(&mut self, delivery: &LearningDelivery) {
        let start = delivery.learn_start_date;
        self.earliest_any = Some(self.earliest_any.map_or(start, |current| current.min(start)));
        if !is_restart(delivery) {
            self.earliest_original = Some(
                self.earliest_original
                    .map_or(start, |current| current.min(start)),
            );
        }
    }

    fn resolve(self) -> Option<NaiveDate> {
        self.earliest_original.or(self.earliest_any)
    }
}

/// The employment status in force on `date`: the latest status effective on
/// or before it. When two statuses share that date, the later one in input
/// order wins.
pub fn qualifying_employment_status(
    statuses: &[EmploymentStatus],
    date: NaiveDate,
) -> Option<&EmploymentStatus> {
    let mut qualifying: Option<&EmploymentStatus> = None;
    for status in statuses {
        if status.date_emp_stat_app > date {
            continue;
        }
        if qualifying.is_none_or(|current| status.date_emp_stat_app >= current.date_emp_stat_app) {
            qualifying = Some(status);
        }
    }
    qualifying
}

/// Age in whole years on `date`. `None` without a date of birth or when
/// `date` precedes it.
pub fn age_at(date_of_birth: Option<NaiveDate>, date: NaiveDate) -> Option<u32> {
    date.years_since(date_of_birth?)
}

/// Age on 31 August of the academic year (1 August to 31 July) that
/// contains `date`.
pub fn age_at_academic_year_start(date_of_birth: Option<NaiveDate>, date: NaiveDate) -> Option<u32> {
    let year = if date.month() >= 8 {
        date.year()
    } else {
        date.year() - 1
    };
    age_at(date_of_birth, NaiveDate::from_ymd_opt(year, 8, 31)?)
}

/// Inclusive overlap of two deliveries' learning periods.
pub fn overlaps(left: &LearningDelivery, right: &LearningDelivery) -> bool {
    left.learn_start_date <= right.effective_end_date()
        && right.learn_start_date <= left.effective_end_date()
}

/// Other deliveries whose learning period overlaps `delivery`.
///
/// `delivery` is expected to be an element of `deliveries`; it is excluded by
/// identity, so a different delivery sharing its sequence number still counts.
pub fn overlapping_deliveries<'a>(
    delivery: &'a LearningDelivery,
    deliveries: &'a [LearningDelivery],
) -> impl Iterator<Item = &'a LearningDelivery> + 'a {
    deliveries
        .iter()
        .filter(move |other| !ptr::eq(*other, delivery) && overlaps(delivery, other))
}

/// Positions in `deliveries` of standard programme aims that overlap another
/// programme aim of the same standard.
pub fn overlapping_standard_programmes(deliveries: &[LearningDelivery]) -> HashSet<usize> {
    let mut groups: HashMap<u32, Vec<(usize, &LearningDelivery)>> = HashMap::new();
    for (position, delivery) in deliveries.iter().enumerate() {
        if !is_standard_programme_aim(delivery) {
            continue;
        }
        if let Some(std_code) = delivery.std_code {
            groups.entry(std_code).or_default().push((position, delivery));
        }
    }

    let mut overlapping = HashSet::new();
    for group in groups.values() {
        for (idx, (left_position, left)) in group.iter().enumerate() {
            for (right_position, right) in &group[idx + 1..] {
                if overlaps(left, right) {
                    overlapping.insert(*left_position);
                    overlapping.insert(*right_position);
                }
            }
        }
    }
    overlapping
}

/// Per-learner facts computed once and shared by every rule.
///
/// Per-delivery facts are stored by position in the learner's
/// `learning_deliveries`, so deliveries that share an aim sequence number
/// keep their own entries. Lookups take a delivery borrowed from that same
/// collection; any other delivery has no per-delivery facts.
#[derive(Debug, Clone, Default)]
pub struct LearnerFacts<'a> {
    deliveries: &'a [LearningDelivery],
    standard_starts: HashMap<u32, NaiveDate>,
    contract_latest_starts: CaseInsensitiveMap<NaiveDate>,
    aim_earliest_starts: CaseInsensitiveMap<NaiveDate>,
    overlapping_programmes: HashSet<usize>,
    classifications: Vec<Classification>,
}

impl<'a> LearnerFacts<'a> {
    pub fn derive(
        learner: &'a Learner,
        reference: &ReferenceData,
        classifier: &CategoryClassifier,
    ) -> Self {
        let deliveries = learner.learning_deliveries.as_slice();
        let standard_starts = standard_programme_starts(deliveries);

        let classifications = deliveries
            .iter()
            .map(|delivery| {
                let programme_start = programme_start_from(&standard_starts, delivery);
                classifier.classify_with_start(delivery, learner, reference, programme_start)
            })
            .collect();

        Self {
            deliveries,
            contract_latest_starts: latest_starts_by_contract(deliveries, |_| true),
            aim_earliest_starts: earliest_starts_by_aim(deliveries),
            overlapping_programmes: overlapping_standard_programmes(deliveries),
            standard_starts,
            classifications,
        }
    }

    /// Position of `delivery` within the learner's deliveries, from its
    /// address.
    fn position(&self, delivery: &LearningDelivery) -> Option<usize> {
        let range = self.deliveries.as_ptr_range();
        let target: *const LearningDelivery = delivery;
        if !range.contains(&target) {
            return None;
        }
        let offset = target as usize - range.start as usize;
        Some(offset / mem::size_of::<LearningDelivery>())
    }

    /// Same contract as [`standard_programme_start`], from the precomputed table.
    pub fn standard_programme_start(&self, delivery: &LearningDelivery) -> Option<NaiveDate> {
        programme_start_from(&self.standard_starts, delivery)
    }

    /// Latest start date of any delivery on `con_ref`.
    pub fn latest_start_for_contract(&self, con_ref: &str) -> Option<NaiveDate> {
        self.contract_latest_starts.get(con_ref).copied()
    }

    /// Earliest start date of any delivery of `learn_aim_ref`.
    pub fn earliest_start_for_aim(&self, learn_aim_ref: &str) -> Option<NaiveDate> {
        self.aim_earliest_starts.get(learn_aim_ref).copied()
    }

    pub fn overlaps_same_standard(&self, delivery: &LearningDelivery) -> bool {
        self.position(delivery)
            .is_some_and(|position| self.overlapping_programmes.contains(&position))
    }

    pub fn classification(&self, delivery: &LearningDelivery) -> Option<&Classification> {
        self.position(delivery)
            .and_then(|position| self.classifications.get(position))
    }
}

fn programme_start_from(
    starts: &HashMap<u32, NaiveDate>,
    delivery: &LearningDelivery,
) -> Option<NaiveDate> {
    if !is_standard_apprenticeship(delivery) {
        return None;
    }
    let std_code = delivery.std_code?;
    Some(
        starts
            .get(&std_code)
            .copied()
            .unwrap_or(delivery.learn_start_date),
    )
}
