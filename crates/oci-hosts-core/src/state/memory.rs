// # Memory Hosts Sink
//
// In-memory implementation of HostsSink.
//
// ## Purpose
//
// Applies the same managed-block merge as the file sink to a string held in
// memory. Used by tests and by dry runs, where the merged result is printed
// instead of written.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::config::BlockConfig;
use crate::state::file::merge_block;
use crate::traits::hosts_sink::{HostsSink, SyncOutcome};

/// In-memory hosts sink
///
/// Clones share the same content, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone)]
pub struct MemoryHostsSink {
    content: Arc<RwLock<String>>,
    block: BlockConfig,
    commits: Arc<AtomicUsize>,
}

impl MemoryHostsSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::with_content("")
    }

    /// Create a sink seeded with existing file content
    pub fn with_content(existing: impl Into<String>) -> Self {
        Self {
            content: Arc::new(RwLock::new(existing.into())),
            block: BlockConfig::default(),
            commits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Use a custom sentinel and marker
    pub fn with_block(mut self, block: BlockConfig) -> Self {
        self.block = block;
        self
    }

    /// Current content
    pub async fn content(&self) -> String {
        self.content.read().await.clone()
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl Default for MemoryHostsSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostsSink for MemoryHostsSink {
    async fn commit(&self, generated: &str) -> Result<SyncOutcome, Error> {
        let mut content = self.content.write().await;
        let (merged, outcome) = merge_block(content.as_bytes(), generated, &self.block);
        // Both inputs are UTF-8, so the merge is too
        *content = String::from_utf8_lossy(&merged).into_owned();
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(outcome)
    }

    fn sink_name(&self) -> String {
        "memory".to_string()
    }
}
