//! tierscan core - batch classification of images by resolution tier.
//!
//! A run is three sequential stages:
//!
//! ```text
//! input dir → Discovery → [WorkItem] → Transform (N workers) → [ClassificationResult]
//!           → Aggregate → AggregateReport → JSON + CSV artifacts
//! ```
//!
//! Each stage is callable on its own so an external scheduler can drive
//! them one at a time; [`Tierscan::run`] chains them for local use.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tierscan_core::{Config, Tierscan};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> tierscan_core::Result<()> {
//!     let tierscan = Tierscan::new(Config::load()?)?;
//!     let outcome = tierscan.run(&CancellationToken::new()).await?;
//!     println!("{} failed", outcome.report.failed_count);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classify;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use classify::ResolutionTier;
pub use config::Config;
pub use error::{
    ConfigError, DiscoveryError, PipelineError, PipelineResult, ReportError, Result,
    TierscanError,
};
pub use pipeline::{FileDiscovery, TransformStage};
pub use report::{AggregateReport, Artifact, ArtifactWriter};
pub use tokio_util::sync::CancellationToken;
pub use types::{ClassificationResult, ItemStatus, WorkItem};

use std::path::Path;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: AggregateReport,
    pub artifacts: Vec<Artifact>,
}

/// Entry point wiring the three stages to one configuration.
pub struct Tierscan {
    config: Config,
    discovery: FileDiscovery,
    transform: TransformStage,
}

impl Tierscan {
    /// Create an instance from a configuration, validating it first.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Initializing tierscan v{}", VERSION);
        Ok(Self {
            discovery: FileDiscovery::new(&config.input),
            transform: TransformStage::new(&config),
            config,
        })
    }

    /// Create an instance from the default config file (or defaults).
    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::load()?)
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stage 1: list work items in the configured input directory.
    pub fn discover(&self) -> Result<Vec<WorkItem>> {
        self.discover_in(&self.config.input_dir())
    }

    /// Stage 1 against an explicit directory.
    pub fn discover_in(&self, dir: &Path) -> Result<Vec<WorkItem>> {
        let items = self.discovery.discover(dir)?;
        tracing::info!("Found {} image(s) in {:?}", items.len(), dir);
        Ok(items)
    }

    /// Stage 2: classify every item on the worker pool.
    pub async fn classify(
        &self,
        items: Vec<WorkItem>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ClassificationResult>> {
        self.transform.run(items, cancel).await
    }

    /// Stage 2 with a per-result callback, e.g. for progress display.
    pub async fn classify_with_progress<F>(
        &self,
        items: Vec<WorkItem>,
        cancel: &CancellationToken,
        on_result: F,
    ) -> Result<Vec<ClassificationResult>>
    where
        F: FnMut(&ClassificationResult),
    {
        self.transform
            .run_with_progress(items, cancel, on_result)
            .await
    }

    /// Stage 3a: reduce results into the run report.
    pub fn aggregate(&self, results: Vec<ClassificationResult>) -> AggregateReport {
        AggregateReport::build(results, chrono::Utc::now())
    }

    /// Stage 3b: persist the report's JSON and CSV artifacts.
    pub fn write_report(&self, report: &AggregateReport) -> Result<Vec<Artifact>> {
        let writer = ArtifactWriter::new(
            self.config.output_dir(),
            report::registered_reporters(self.config.output.pretty),
        );
        Ok(writer.write(report)?)
    }

    /// Run all stages in order.
    ///
    /// Cancellation is honoured between stages and while dispatching items;
    /// a cancelled run never writes artifacts.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunOutcome> {
        let items = self.discover()?;
        let total = items.len();
        if cancel.is_cancelled() {
            return Err(TierscanError::Cancelled {
                completed: 0,
                total,
            });
        }

        let results = self.classify(items, cancel).await?;
        if cancel.is_cancelled() {
            return Err(TierscanError::Cancelled {
                completed: results.len(),
                total,
            });
        }

        let report = self.aggregate(results);
        let artifacts = self.write_report(&report)?;
        Ok(RunOutcome { report, artifacts })
    }
}
