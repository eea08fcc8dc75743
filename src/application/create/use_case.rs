//! Create Use Case
//!
//! Orchestrates one run against an output directory.

use crate::assets::{Stock, StockContext};
use crate::domain::services::Resolver;
use crate::error::ForgeResult;
use crate::infrastructure::{load_on_disk_files, RunLock};

use super::options::CreateOptions;
use super::result::CreateResult;

/// Create use case - resolves a target's assets into the output directory
pub struct CreateUseCase {
    context: StockContext,
}

impl CreateUseCase {
    /// Create a new use case around the run's collaborators
    pub fn new(context: StockContext) -> Self {
        Self { context }
    }

    /// Execute the run.
    ///
    /// The first asset failure aborts the run. Whatever was persisted before
    /// it stays on disk and is picked up from the snapshot next time.
    pub fn execute(&self, options: &CreateOptions) -> ForgeResult<CreateResult> {
        let dir = &options.output_dir;
        let lock = RunLock::acquire(dir)?;
        tracing::debug!(lock = %lock.path().display(), "acquired run lock");

        let on_disk = load_on_disk_files(dir)?;
        tracing::debug!(files = on_disk.len(), dir = %dir.display(), "snapshot taken");

        let stock = Stock::establish(self.context.clone());
        let mut resolver = Resolver::new(stock.graph(), &on_disk).persist_to(dir);

        for root in stock.roots(options.target) {
            resolver.resolve(root)?;
        }

        let result = CreateResult {
            target: options.target,
            output_dir: dir.clone(),
            report: resolver.report(),
        };
        tracing::info!(
            target = %options.target,
            generated = result.generated(),
            on_disk = result.on_disk(),
            skipped = result.skipped(),
            "target created"
        );
        Ok(result)
    }
}
