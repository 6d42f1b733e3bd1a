//! Validation failure types.
//!
//! A [`ValidationFailure`] is what a rule raises. It carries only the facts
//! the rule observed; severity and message text are resolved later from the
//! rule table so a rule never hardcodes either.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ModelError;

/// Failure severity level.
///
/// Deserializes through [`Severity::parse`], so JSON rule tables accept the
/// same spellings as CSV ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    /// The whole submission is rejected.
    Reject,
    /// The learner record is rejected.
    Error,
    /// Should be reviewed; the record is still accepted.
    Warning,
}

impl Severity {
    /// Parse a severity from a rule table cell.
    ///
    /// Accepts the full names and the single-letter codes used in published
    /// rule tables (`E`, `W`, `F`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "fail" | "f" => Some(Self::Reject),
            "error" | "e" => Some(Self::Error),
            "warning" | "w" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reject => "Reject",
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }

    /// Reject and Error both block the learner.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Reject | Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Severity {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, ModelError> {
        Self::parse(&value).ok_or(ModelError::UnknownCode {
            kind: "severity",
            value,
        })
    }
}

/// Named message parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorParameter {
    pub name: String,
    pub value: String,
}

impl ErrorParameter {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// One rule's report that a record did not satisfy its condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub rule_name: String,
    pub learn_ref_number: String,
    pub aim_seq_number: Option<u32>,
    pub parameters: Vec<ErrorParameter>,
}

impl ValidationFailure {
    pub fn new(rule_name: impl Into<String>, learn_ref_number: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            learn_ref_number: learn_ref_number.into(),
            aim_seq_number: None,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn for_aim(mut self, aim_seq_number: u32) -> Self {
        self.aim_seq_number = Some(aim_seq_number);
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<ErrorParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Parameter value by name (first match).
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name == name)
            .map(|parameter| parameter.value.as_str())
    }
}
