//! Learner record data model.
//!
//! This crate defines the record graph submitted by a training provider and
//! the value types produced when that graph is validated:
//!
//! - **Record graph** ([`learner`]): learners, learning deliveries, delivery
//!   monitoring markers (FAMs), financial records, employment statuses
//! - **Coded values** ([`codes`]): fund models, aim types, programme types,
//!   completion and employment status codes
//! - **Validation output** ([`failure`]): raised failures and severities
//! - **Key policy** ([`lookup`]): the single case-insensitive key
//!   normalization used by every lookup table
//!
//! # Example
//!
//! ```ignore
//! use ilr_model::{Submission, FundModel};
//!
//! let submission: Submission = serde_json::from_reader(file)?;
//! let adult_skills = submission
//!     .learners
//!     .iter()
//!     .flat_map(|learner| &learner.learning_deliveries)
//!     .filter(|delivery| delivery.fund_model == FundModel::AdultSkills)
//!     .count();
//! ```

pub mod codes;
pub mod error;
pub mod failure;
pub mod learner;
pub mod lookup;

pub use codes::{AimType, CompletionStatus, EmploymentStatusCode, FundModel, ProgType, fam};
pub use error::{ModelError, Result};
pub use failure::{ErrorParameter, Severity, ValidationFailure};
pub use learner::{
    DeliveryFam, EmploymentMonitoring, EmploymentStatus, FinancialRecord, Learner,
    LearningDelivery, Submission,
};
pub use lookup::{CaseInsensitiveMap, normalize_key, normalize_postcode};
