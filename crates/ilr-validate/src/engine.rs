//! Rule evaluation engine.
//!
//! Learners are evaluated in parallel on a dedicated rayon pool. Each learner
//! pass derives [`LearnerFacts`] once, runs every rule against them, and
//! returns its own buffer; buffers are concatenated in submission order once
//! every pass has finished. Shared state is read-only.
//!
//! A panic inside a rule (or inside fact derivation) is caught, logged, and
//! recorded as a [`RuleDefect`]; the remaining rules and learners proceed.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use ilr_model::{Learner, ValidationFailure};

use crate::aggregate::{ErrorAggregator, ValidationOutput};
use crate::cancel::CancellationToken;
use crate::derived::LearnerFacts;
use crate::error::Result;
use crate::rule::{LearnerContext, RuleSet};

/// Engine tuning.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Worker threads; `None` uses one per available core.
    pub threads: Option<usize>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// A rule or derivation that panicked while evaluating a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDefect {
    pub learn_ref_number: String,
    /// `None` when fact derivation itself failed and no rule ran.
    pub rule_name: Option<String>,
    pub message: String,
}

/// Result of evaluating one learner.
#[derive(Debug, Clone, Default)]
pub struct LearnerOutcome {
    pub failures: Vec<ValidationFailure>,
    pub defects: Vec<RuleDefect>,
}

/// Raw result of a run, before aggregation.
#[derive(Debug, Clone, Default)]
pub struct EvaluationRun {
    pub failures: Vec<ValidationFailure>,
    pub learners_evaluated: usize,
    pub learners_skipped: usize,
    pub defects: Vec<RuleDefect>,
    /// Cancellation left at least one learner unevaluated.
    pub cancelled: bool,
}

/// Aggregated result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub output: ValidationOutput,
    pub learners_evaluated: usize,
    pub learners_skipped: usize,
    pub defects: Vec<RuleDefect>,
    pub cancelled: bool,
}

impl ValidationReport {
    /// True when any error-severity failure or rule defect was produced.
    pub fn has_blocking_issues(&self) -> bool {
        self.output.has_errors() || !self.defects.is_empty()
    }
}

enum LearnerPass {
    Evaluated(LearnerOutcome),
    Skipped,
}

/// Runs a [`RuleSet`] over learners.
pub struct ValidationEngine {
    rule_set: RuleSet,
    pool: rayon::ThreadPool,
}

impl ValidationEngine {
    /// # Errors
    ///
    /// [`ValidateError::ThreadPool`](crate::ValidateError::ThreadPool) when
    /// the worker pool cannot be created.
    pub fn new(rule_set: RuleSet, options: &EngineOptions) -> Result<Self> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|idx| format!("ilr-validate-{idx}"));
        if let Some(threads) = options.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        info!(
            rules = rule_set.len(),
            threads = pool.current_num_threads(),
            "Validation engine ready"
        );
        Ok(Self { rule_set, pool })
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluate every rule against one learner.
    pub fn evaluate_learner(&self, learner: &Learner) -> LearnerOutcome {
        let reference = self.rule_set.reference().as_ref();
        let classifier = self.rule_set.classifier();

        let facts = match catch_unwind(AssertUnwindSafe(|| {
            LearnerFacts::derive(learner, reference, classifier)
        })) {
            Ok(facts) => facts,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(rule = "<derived facts>", %message, "Fact derivation panicked");
                return LearnerOutcome {
                    failures: Vec::new(),
                    defects: vec![RuleDefect {
                        learn_ref_number: learner.learn_ref_number.clone(),
                        rule_name: None,
                        message,
                    }],
                };
            }
        };

        let ctx = LearnerContext::new(learner, reference, &facts);
        let mut outcome = LearnerOutcome::default();
        for rule in self.rule_set.rules() {
            match catch_unwind(AssertUnwindSafe(|| rule.validate(&ctx))) {
                Ok(failures) => outcome.failures.extend(failures),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(rule = rule.name(), %message, "Rule panicked");
                    outcome.defects.push(RuleDefect {
                        learn_ref_number: learner.learn_ref_number.clone(),
                        rule_name: Some(rule.name().to_string()),
                        message,
                    });
                }
            }
        }
        outcome
    }

    /// Evaluate all learners, stopping before unstarted learners once
    /// `token` is cancelled.
    pub fn run(&self, learners: &[Learner], token: &CancellationToken) -> EvaluationRun {
        let span = info_span!("validate", learners = learners.len());
        let _guard = span.enter();

        let passes: Vec<LearnerPass> = self.pool.install(|| {
            learners
                .par_iter()
                .enumerate()
                .map(|(idx, learner)| {
                    if token.is_cancelled() {
                        return LearnerPass::Skipped;
                    }
                    let outcome = self.evaluate_learner(learner);
                    debug!(
                        learner = idx,
                        failures = outcome.failures.len(),
                        defects = outcome.defects.len(),
                        "Learner evaluated"
                    );
                    LearnerPass::Evaluated(outcome)
                })
                .collect()
        });

        let mut run = EvaluationRun::default();
        for pass in passes {
            match pass {
                LearnerPass::Evaluated(outcome) => {
                    run.learners_evaluated += 1;
                    run.failures.extend(outcome.failures);
                    run.defects.extend(outcome.defects);
                }
                LearnerPass::Skipped => run.learners_skipped += 1,
            }
        }
        run.cancelled = run.learners_skipped > 0;

        if run.cancelled {
            warn!(
                evaluated = run.learners_evaluated,
                skipped = run.learners_skipped,
                "Validation cancelled"
            );
        }
        info!(
            evaluated = run.learners_evaluated,
            failures = run.failures.len(),
            defects = run.defects.len(),
            "Evaluation finished"
        );
        run
    }

    /// Run and aggregate in one step.
    pub fn validate(&self, learners: &[Learner], token: &CancellationToken) -> ValidationReport {
        let run = self.run(learners, token);
        let output = ErrorAggregator::new(self.rule_set.reference()).aggregate(run.failures);
        ValidationReport {
            output,
            learners_evaluated: run.learners_evaluated,
            learners_skipped: run.learners_skipped,
            defects: run.defects,
            cancelled: run.cancelled,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
