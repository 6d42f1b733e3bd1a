//! Rule evaluation for learner record submissions.
//!
//! This crate provides:
//!
//! - **Derived facts** ([`derived`]): pure, order-independent facts computed
//!   from a learner's record graph, and [`LearnerFacts`] which computes the
//!   collection-wide ones once per learner
//! - **Classification** ([`classify`]): funding category decision tree
//! - **Rules** ([`rule`], [`catalogue`]): the rule interface, declarative
//!   rules, and the shipped catalogue
//! - **Engine** ([`engine`]): parallel, cancellable evaluation with per-rule
//!   panic isolation
//! - **Aggregation** ([`aggregate`]): severity and message resolution and
//!   stable output ordering
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ilr_validate::{CancellationToken, EngineOptions, RuleSet, ValidationEngine, catalogue};
//!
//! let rule_set = RuleSet::builder()
//!     .reference(Arc::new(reference))
//!     .rules(catalogue::standard_rules())
//!     .build()?;
//! let engine = ValidationEngine::new(rule_set, &EngineOptions::new())?;
//! let report = engine.validate(&submission.learners, &CancellationToken::none());
//!
//! for row in &report.output.results {
//!     println!("{} {} {:?}", row.learn_ref_number, row.rule_name, row.severity);
//! }
//! ```

pub mod aggregate;
pub mod cancel;
pub mod catalogue;
pub mod classify;
pub mod derived;
pub mod engine;
pub mod error;
pub mod rule;

pub use aggregate::{ErrorAggregator, ResolvedFailure, ValidationOutput};
pub use cancel::{CancellationSource, CancellationToken};
pub use classify::{CategoryClassifier, Classification, FundingCategory};
pub use derived::LearnerFacts;
pub use engine::{
    EngineOptions, EvaluationRun, LearnerOutcome, RuleDefect, ValidationEngine, ValidationReport,
};
pub use error::{Result, ValidateError};
pub use rule::{DeclarativeRule, LearnerContext, Rule, RuleCheck, RuleScope, RuleSet, RuleSetBuilder};
