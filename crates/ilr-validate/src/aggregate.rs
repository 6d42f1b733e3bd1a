//! Validation error aggregation.
//!
//! Turns raw [`ValidationFailure`]s into output rows: severity and message
//! are resolved from the reference rule table, message templates are filled
//! from the failure's parameters, and rows are put into a stable order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use ilr_model::{ErrorParameter, Severity, ValidationFailure, normalize_key};
use ilr_reference::ReferenceData;

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFailure {
    pub rule_name: String,
    pub learn_ref_number: String,
    pub aim_seq_number: Option<u32>,
    /// `None` when the rule is not in the rule table.
    pub severity: Option<Severity>,
    pub message: Option<String>,
    pub parameters: Vec<ErrorParameter>,
}

/// Ordered, severity-resolved failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutput {
    pub results: Vec<ResolvedFailure>,
}

impl ValidationOutput {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|row| row.severity == Some(severity))
            .count()
    }

    pub fn reject_count(&self) -> usize {
        self.count_severity(Severity::Reject)
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    /// Rows whose rule has no severity.
    pub fn unresolved_count(&self) -> usize {
        self.results
            .iter()
            .filter(|row| row.severity.is_none())
            .count()
    }

    /// True when any row blocks the submission.
    pub fn has_errors(&self) -> bool {
        self.results
            .iter()
            .any(|row| row.severity.is_some_and(|severity| severity.is_blocking()))
    }

    /// Rows grouped by learner reference, in output order.
    pub fn by_learner(&self) -> BTreeMap<&str, Vec<&ResolvedFailure>> {
        let mut grouped: BTreeMap<&str, Vec<&ResolvedFailure>> = BTreeMap::new();
        for row in &self.results {
            grouped
                .entry(row.learn_ref_number.as_str())
                .or_default()
                .push(row);
        }
        grouped
    }

    /// Row count per rule name, sorted by rule name.
    pub fn rule_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in &self.results {
            *counts.entry(row.rule_name.as_str()).or_default() += 1;
        }
        counts
    }
}

/// Resolves failures against the reference rule table.
#[derive(Debug, Clone, Copy)]
pub struct ErrorAggregator<'a> {
    reference: &'a ReferenceData,
}

impl<'a> ErrorAggregator<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    pub fn aggregate(&self, failures: Vec<ValidationFailure>) -> ValidationOutput {
        let mut unknown_rules = HashSet::new();
        let mut results: Vec<ResolvedFailure> = failures
            .into_iter()
            .map(|failure| {
                let metadata = self.reference.rule_metadata(&failure.rule_name);
                if metadata.is_none() && unknown_rules.insert(normalize_key(&failure.rule_name)) {
                    warn!(
                        rule = %failure.rule_name,
                        "Rule has no entry in the rule table; severity left unresolved"
                    );
                }
                let severity = metadata.and_then(|rule| rule.severity);
                let message = metadata
                    .filter(|rule| !rule.message.trim().is_empty())
                    .map(|rule| interpolate(&rule.message, &failure.parameters));
                ResolvedFailure {
                    rule_name: failure.rule_name,
                    learn_ref_number: failure.learn_ref_number,
                    aim_seq_number: failure.aim_seq_number,
                    severity,
                    message,
                    parameters: failure.parameters,
                }
            })
            .collect();

        results.sort_by(compare_rows);

        let output = ValidationOutput { results };
        info!(
            rows = output.len(),
            errors = output.error_count(),
            warnings = output.warning_count(),
            unresolved = output.unresolved_count(),
            "Failures aggregated"
        );
        output
    }
}

fn compare_rows(left: &ResolvedFailure, right: &ResolvedFailure) -> Ordering {
    left.learn_ref_number
        .cmp(&right.learn_ref_number)
        .then_with(|| compare_ignore_case(&left.rule_name, &right.rule_name))
        .then_with(|| left.aim_seq_number.cmp(&right.aim_seq_number))
}

fn compare_ignore_case(left: &str, right: &str) -> Ordering {
    left.bytes()
        .map(|byte| byte.to_ascii_uppercase())
        .cmp(right.bytes().map(|byte| byte.to_ascii_uppercase()))
}

/// Replace `{Name}` placeholders with parameter values.
///
/// Placeholder names match parameters case-insensitively. Unknown
/// placeholders and unbalanced braces are copied through unchanged.
pub fn interpolate(template: &str, parameters: &[ErrorParameter]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            rendered.push_str(&rest[open..]);
            return rendered;
        };
        let name = &after_open[..close];
        match parameters
            .iter()
            .find(|parameter| parameter.name.eq_ignore_ascii_case(name.trim()))
        {
            Some(parameter) => rendered.push_str(&parameter.value),
            None => {
                rendered.push('{');
                rendered.push_str(name);
                rendered.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }
    rendered.push_str(rest);
    rendered
}
