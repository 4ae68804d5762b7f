// # Hosts Sink Implementations
//
// This module provides implementations of the HostsSink trait: the
// managed-block file that owns the durable state of a run, and an in-memory
// sink for tests and dry runs.

pub mod file;
pub mod memory;

pub use file::{ManagedBlockFile, merge_block};
pub use memory::MemoryHostsSink;
