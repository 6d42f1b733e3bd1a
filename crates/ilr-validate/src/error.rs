//! Error types for the validation crate.
//!
//! Only wiring defects are errors here. Data-quality problems become
//! [`ValidationFailure`](ilr_model::ValidationFailure)s and a rule that
//! misbehaves at evaluation time becomes a
//! [`RuleDefect`](crate::engine::RuleDefect); neither stops a run.

use thiserror::Error;

/// Configuration errors raised before any evaluation begins.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ValidateError {
    /// A required collaborator was not supplied to a builder.
    #[error("Missing required collaborator: {collaborator}")]
    MissingCollaborator {
        /// Name of the missing collaborator.
        collaborator: &'static str,
    },

    /// A rule definition is unusable.
    #[error("Invalid rule '{name}': {reason}")]
    InvalidRule {
        /// Rule name as declared.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for validation setup.
pub type Result<T> = std::result::Result<T, ValidateError>;

impl ValidateError {
    pub(crate) fn missing(collaborator: &'static str) -> Self {
        Self::MissingCollaborator { collaborator }
    }

    pub(crate) fn invalid_rule(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for wiring defects that must stop the run before evaluation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCollaborator { .. } | Self::InvalidRule { .. }
        )
    }

    /// A hint for fixing the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingCollaborator { .. } => {
                Some("Supply every collaborator to the builder before calling build().")
            }
            Self::InvalidRule { .. } => Some("Give every rule a unique, non-empty name."),
            Self::ThreadPool(_) => Some("Lower the requested thread count."),
        }
    }
}
