use std::path::PathBuf;

use ilr_validate::ValidationReport;

#[derive(Debug)]
pub struct ValidateResult {
    pub submission: PathBuf,
    pub ukprn: Option<u64>,
    pub learners: usize,
    pub report: ValidationReport,
    pub output: Option<PathBuf>,
}

impl ValidateResult {
    /// Blocking failures or rule defects fail the run.
    pub fn has_errors(&self) -> bool {
        self.report.has_blocking_issues()
    }
}
