//! Reference data cache for learner record validation.
//!
//! This crate provides:
//!
//! - **Raw tables** ([`ReferenceTables`]): rows supplied by ingestion
//! - **The cache** ([`ReferenceData`]): immutable, indexed lookups built once
//!   per run and shared read-only by every validation component
//! - **Validity windows** ([`DateWindow`]): inclusive date ranges, open-ended
//!   when no end date is given
//! - **Loaders**: JSON bundle and CSV rule table
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ilr_reference::{ReferenceData, ReferenceTables, load_rule_table_csv};
//!
//! let tables = ReferenceTables::from_json_path(bundle)?
//!     .with_rule_table(load_rule_table_csv(rules_csv)?);
//! let reference = Arc::new(ReferenceData::build(tables));
//!
//! if !reference.aim_valid_on("60012345", "ADULT_SKILLS", start_date) {
//!     // not fundable under adult skills on that date
//! }
//! ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod tables;
pub mod window;

pub use cache::{ReferenceData, ReferenceSummary};
pub use error::{ReferenceError, Result};
pub use loader::load_rule_table_csv;
pub use tables::{
    ContractAllocation, QualificationValidity, ReferenceTables, RuleMetadata, StandardValidity,
};
pub use window::DateWindow;
