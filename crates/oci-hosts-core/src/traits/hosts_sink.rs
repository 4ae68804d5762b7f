// # Hosts Sink Trait
//
// Defines the interface for committing a freshly generated hosts block.
//
// ## Implementations
//
// - Managed-block file: [`crate::state::ManagedBlockFile`]
// - In-memory: [`crate::state::MemoryHostsSink`] (tests, dry runs)

use async_trait::async_trait;

/// How a commit merged the generated block into the existing content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether an existing sentinel line was found and its block replaced
    pub replaced_block: bool,
    /// Lines kept verbatim ahead of the marker
    pub preserved_lines: usize,
    /// Generated lines written after the marker
    pub generated_lines: usize,
}

/// Trait for hosts sink implementations
///
/// # Trust Level: Trusted (Core Component)
///
/// A sink is touched exactly once per run, after the walk has finished.
/// It must either commit the whole block or leave the target untouched.
#[async_trait]
pub trait HostsSink: Send + Sync {
    /// Commit the generated block
    ///
    /// # Parameters
    ///
    /// - `generated`: Rendered hosts lines, each terminated by `\n`
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome)`: The block was committed
    /// - `Err(Error)`: Nothing was committed
    async fn commit(&self, generated: &str) -> Result<SyncOutcome, crate::Error>;

    /// Get the sink name (for logging/debugging)
    fn sink_name(&self) -> String;
}
