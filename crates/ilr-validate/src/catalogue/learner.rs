//! Learner-level and employment-status rules.

use ilr_model::{EmploymentStatus, ErrorParameter, normalize_postcode};

use super::{format_date, format_optional};
use crate::rule::LearnerContext;

/// ULN reserved for learners without one.
const TEMPORARY_ULN: u64 = 9_999_999_999;
/// Postcode used when the prior postcode is not known.
const UNKNOWN_POSTCODE: &str = "ZZ999ZZ";
/// Employer identifier used when the employer is not yet known.
const TEMPORARY_EMP_ID: u64 = 999_999_999;

pub(super) fn uln_unknown(ctx: &LearnerContext<'_>) -> bool {
    ctx.learner
        .uln
        .is_some_and(|uln| uln != TEMPORARY_ULN && !ctx.reference.uln_exists(uln))
}

pub(super) fn uln_parameters(ctx: &LearnerContext<'_>) -> Vec<ErrorParameter> {
    vec![ErrorParameter::new("ULN", format_optional(ctx.learner.uln))]
}

pub(super) fn postcode_unknown(ctx: &LearnerContext<'_>) -> bool {
    let Some(postcode) = ctx.learner.postcode_prior.as_deref() else {
        return false;
    };
    let normalized = normalize_postcode(postcode);
    !normalized.is_empty()
        && normalized != UNKNOWN_POSTCODE
        && !ctx.reference.postcode_exists(postcode)
}

pub(super) fn postcode_parameters(ctx: &LearnerContext<'_>) -> Vec<ErrorParameter> {
    vec![ErrorParameter::new(
        "PostcodePrior",
        ctx.learner.postcode_prior.as_deref().unwrap_or_default(),
    )]
}

pub(super) fn employer_unknown(ctx: &LearnerContext<'_>, status: &EmploymentStatus) -> bool {
    status
        .emp_id
        .is_some_and(|emp_id| emp_id != TEMPORARY_EMP_ID && !ctx.reference.employer_exists(emp_id))
}

pub(super) fn employer_parameters(
    _ctx: &LearnerContext<'_>,
    status: &EmploymentStatus,
) -> Vec<ErrorParameter> {
    vec![
        ErrorParameter::new("EmpId", format_optional(status.emp_id)),
        ErrorParameter::new("DateEmpStatApp", format_date(status.date_emp_stat_app)),
    ]
}
