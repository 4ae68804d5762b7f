//! Core hosts engine
//!
//! The HostsEngine is responsible for one run:
//! - Walking the tenancy via NetworkInventory
//! - Rendering qualifying private IPs into a hosts buffer
//! - Committing the buffer through a HostsSink
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   pages   ┌─────────────────┐  HostRecord  ┌─────────────┐
//! │ NetworkInventory │──────────▶│ HierarchyWalker │─────────────▶│ HostsBuffer │
//! └──────────────────┘           └─────────────────┘              └─────────────┘
//!                                                                        │
//!                                                                        ▼
//!                                                                 ┌─────────────┐
//!                                                                 │  HostsSink  │
//!                                                                 │  (commit)   │
//!                                                                 └─────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Resolve the compartment set (fatal on failure, nothing is written)
//! 2. Walk VCNs, subnets and private IPs, isolating branch failures
//! 3. Commit the buffer once, after the walk has finished

use crate::config::HostsConfig;
use crate::error::Result;
use crate::record::HostsBuffer;
use crate::traits::{HostsSink, NetworkInventory, SyncOutcome};
use crate::walker::{HierarchyWalker, WalkReport};
use tracing::{info, warn};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Walk statistics and isolated failures
    pub walk: WalkReport,
    /// How the block was merged into the target
    pub sync: SyncOutcome,
    /// Sink the block was committed to
    pub target: String,
}

impl RunSummary {
    /// Number of host lines written
    pub fn lines_written(&self) -> usize {
        self.sync.generated_lines
    }
}

/// Core hosts engine
///
/// ## Lifecycle
///
/// 1. Create with [`HostsEngine::new()`]
/// 2. Call [`HostsEngine::run()`]; every run re-fetches the inventory
///
/// ## Threading
///
/// A run is strictly sequential: one listing call at a time, and the sink is
/// touched once at the end.
pub struct HostsEngine {
    /// Listing capability for the tenancy
    inventory: Box<dyn NetworkInventory>,

    /// Destination of the generated block
    sink: Box<dyn HostsSink>,

    /// Run configuration
    config: HostsConfig,
}

impl HostsEngine {
    /// Create a new hosts engine
    ///
    /// # Parameters
    ///
    /// - `inventory`: Network inventory implementation
    /// - `sink`: Hosts sink implementation
    /// - `config`: Run configuration
    pub fn new(
        inventory: Box<dyn NetworkInventory>,
        sink: Box<dyn HostsSink>,
        config: HostsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            inventory,
            sink,
            config,
        })
    }

    /// The run configuration
    pub fn config(&self) -> &HostsConfig {
        &self.config
    }

    /// Walk the tenancy and commit the generated block
    ///
    /// # Returns
    ///
    /// - `Ok(RunSummary)`: The block was committed, possibly with isolated branch failures
    /// - `Err(Error)`: A fatal error; the sink was not touched if the walk failed
    pub async fn run(&self) -> Result<RunSummary> {
        let walker = HierarchyWalker::new(self.inventory.as_ref(), &self.config.domain_suffix);

        let mut buffer = HostsBuffer::new();
        let walk = walker
            .walk(&self.config.root_compartment, |record| buffer.push(&record))
            .await?;

        if !walk.is_complete() {
            warn!(
                "{} branch(es) could not be listed via {}; their hosts are missing from this run",
                walk.failures.len(),
                self.inventory.provider_name()
            );
        }

        let sync = self.sink.commit(buffer.as_str()).await?;
        let target = self.sink.sink_name();

        info!("Wrote {} lines to {}", buffer.len(), target);

        Ok(RunSummary { walk, sync, target })
    }
}
