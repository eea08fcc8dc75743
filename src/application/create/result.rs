//! Create result types

use std::path::PathBuf;

use crate::domain::services::{Origin, ReportEntry, ResolveReport};
use crate::domain::value_objects::Target;

/// Result of a create run
#[derive(Debug, Clone)]
pub struct CreateResult {
    pub target: Target,
    pub output_dir: PathBuf,
    /// Every asset the run touched, in completion order
    pub report: ResolveReport,
}

impl CreateResult {
    pub fn entries(&self) -> &[ReportEntry] {
        &self.report.entries
    }

    pub fn generated(&self) -> usize {
        self.report.count(Origin::Generated)
    }

    pub fn on_disk(&self) -> usize {
        self.report.count(Origin::OnDisk)
    }

    pub fn skipped(&self) -> usize {
        self.report.count(Origin::Skipped)
    }

    /// Nothing new was produced
    pub fn is_up_to_date(&self) -> bool {
        self.generated() == 0
    }
}
