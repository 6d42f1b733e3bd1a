//! Rule interface, declarative rules, and the rule set builder.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use ilr_model::{
    EmploymentStatus, ErrorParameter, Learner, LearningDelivery, ValidationFailure, normalize_key,
};
use ilr_reference::ReferenceData;

use crate::classify::CategoryClassifier;
use crate::derived::LearnerFacts;
use crate::error::{Result, ValidateError};

/// Everything a rule may read while validating one learner.
#[derive(Debug, Clone, Copy)]
pub struct LearnerContext<'a> {
    pub learner: &'a Learner,
    pub reference: &'a ReferenceData,
    pub facts: &'a LearnerFacts<'a>,
}

impl<'a> LearnerContext<'a> {
    pub fn new(
        learner: &'a Learner,
        reference: &'a ReferenceData,
        facts: &'a LearnerFacts<'a>,
    ) -> Self {
        Self {
            learner,
            reference,
            facts,
        }
    }

    pub fn learn_ref_number(&self) -> &'a str {
        &self.learner.learn_ref_number
    }
}

/// A business rule evaluated against one learner at a time.
///
/// Implementations must not keep state between calls; the engine evaluates
/// learners concurrently and in no particular order. "No failure" is an
/// empty vector.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, ctx: &LearnerContext<'_>) -> Vec<ValidationFailure>;
}

/// Record level a declarative rule iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Learner,
    Delivery,
    EmploymentStatus,
}

impl RuleScope {
    pub fn label(self) -> &'static str {
        match self {
            RuleScope::Learner => "learner",
            RuleScope::Delivery => "delivery",
            RuleScope::EmploymentStatus => "employment status",
        }
    }
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub type LearnerPredicate = fn(&LearnerContext<'_>) -> bool;
pub type LearnerParameters = fn(&LearnerContext<'_>) -> Vec<ErrorParameter>;
pub type DeliveryPredicate = fn(&LearnerContext<'_>, &LearningDelivery) -> bool;
pub type DeliveryParameters = fn(&LearnerContext<'_>, &LearningDelivery) -> Vec<ErrorParameter>;
pub type StatusPredicate = fn(&LearnerContext<'_>, &EmploymentStatus) -> bool;
pub type StatusParameters = fn(&LearnerContext<'_>, &EmploymentStatus) -> Vec<ErrorParameter>;

/// Predicate and parameter builder for one record level.
#[derive(Clone, Copy)]
pub enum RuleCheck {
    Learner {
        fails: LearnerPredicate,
        parameters: LearnerParameters,
    },
    Delivery {
        fails: DeliveryPredicate,
        parameters: DeliveryParameters,
    },
    /// Failures are reported against the learner.
    EmploymentStatus {
        fails: StatusPredicate,
        parameters: StatusParameters,
    },
}

impl RuleCheck {
    pub fn scope(&self) -> RuleScope {
        match self {
            RuleCheck::Learner { .. } => RuleScope::Learner,
            RuleCheck::Delivery { .. } => RuleScope::Delivery,
            RuleCheck::EmploymentStatus { .. } => RuleScope::EmploymentStatus,
        }
    }
}

/// A rule built from a table row.
#[derive(Clone)]
pub struct DeclarativeRule {
    name: &'static str,
    description: &'static str,
    check: RuleCheck,
}

impl DeclarativeRule {
    pub const fn new(name: &'static str, description: &'static str, check: RuleCheck) -> Self {
        Self {
            name,
            description,
            check,
        }
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn scope(&self) -> RuleScope {
        self.check.scope()
    }
}

impl fmt::Debug for DeclarativeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclarativeRule")
            .field("name", &self.name)
            .field("scope", &self.scope())
            .finish()
    }
}

impl Rule for DeclarativeRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, ctx: &LearnerContext<'_>) -> Vec<ValidationFailure> {
        let learn_ref_number = ctx.learn_ref_number();
        match self.check {
            RuleCheck::Learner { fails, parameters } => {
                if fails(ctx) {
                    vec![
                        ValidationFailure::new(self.name, learn_ref_number)
                            .with_parameters(parameters(ctx)),
                    ]
                } else {
                    Vec::new()
                }
            }
            RuleCheck::Delivery { fails, parameters } => ctx
                .learner
                .learning_deliveries
                .iter()
                .filter(|delivery| fails(ctx, delivery))
                .map(|delivery| {
                    ValidationFailure::new(self.name, learn_ref_number)
                        .for_aim(delivery.aim_seq_number)
                        .with_parameters(parameters(ctx, delivery))
                })
                .collect(),
            RuleCheck::EmploymentStatus { fails, parameters } => ctx
                .learner
                .employment_statuses
                .iter()
                .filter(|status| fails(ctx, status))
                .map(|status| {
                    ValidationFailure::new(self.name, learn_ref_number)
                        .with_parameters(parameters(ctx, status))
                })
                .collect(),
        }
    }
}

/// The validated collection of rules plus the reference data they read.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
    reference: Arc<ReferenceData>,
    classifier: CategoryClassifier,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn reference(&self) -> &Arc<ReferenceData> {
        &self.reference
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RuleSet`]. Every collaborator is required.
#[derive(Default)]
pub struct RuleSetBuilder {
    reference: Option<Arc<ReferenceData>>,
    rules: Option<Vec<Box<dyn Rule>>>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn reference(mut self, reference: Arc<ReferenceData>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Add a table of rules.
    #[must_use]
    pub fn rules<I, R>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Rule + 'static,
    {
        let table = self.rules.get_or_insert_with(Vec::new);
        table.extend(
            rules
                .into_iter()
                .map(|rule| Box::new(rule) as Box<dyn Rule>),
        );
        self
    }

    /// Add a single rule.
    #[must_use]
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.get_or_insert_with(Vec::new).push(Box::new(rule));
        self
    }

    /// Validate the wiring and produce the rule set.
    ///
    /// # Errors
    ///
    /// [`ValidateError::MissingCollaborator`] when the reference data or the
    /// rule table was never supplied, [`ValidateError::InvalidRule`] for an
    /// empty or duplicated (case-insensitive) rule name.
    pub fn build(self) -> Result<RuleSet> {
        let reference = self
            .reference
            .ok_or_else(|| ValidateError::missing("reference data"))?;
        let rules = self
            .rules
            .ok_or_else(|| ValidateError::missing("rule table"))?;

        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            let name = rule.name();
            if name.trim().is_empty() {
                return Err(ValidateError::invalid_rule(name, "rule name is empty"));
            }
            if !seen.insert(normalize_key(name)) {
                return Err(ValidateError::invalid_rule(name, "rule name is declared twice"));
            }
        }

        Ok(RuleSet {
            rules,
            reference,
            classifier: CategoryClassifier::new(),
        })
    }
}
