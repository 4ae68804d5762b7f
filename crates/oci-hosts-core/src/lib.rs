// # oci-hosts-core
//
// Core library for the OCI hosts builder.
//
// ## Architecture Overview
//
// This library walks an OCI tenancy and merges the discovered hosts into a
// managed block of a hosts file:
// - **NetworkInventory**: Trait for the four listing capabilities (compartments, VCNs, subnets, private IPs)
// - **pager**: One cursor-driven pagination loop shared by every listing
// - **HierarchyWalker**: Walks compartments → VCNs → subnets → private IPs, isolating branch failures
// - **HostRecord**: Turns a qualifying private IP into a hosts line
// - **HostsSink**: Trait for committing the generated block (managed-block file, in-memory)
// - **HostsEngine**: Orchestrates walk → buffer → commit for one run
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Provider plumbing lives outside the core
// 2. **Best-Effort Walk**: A failing branch is logged and skipped, siblings continue
// 3. **Library-First**: The CLI is a thin layer over this crate
// 4. **Idempotency**: Re-running with the same inventory yields byte-identical files

pub mod traits;
pub mod pager;
pub mod walker;
pub mod record;
pub mod engine;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{NetworkInventory, HostsSink};
pub use traits::inventory::{Compartment, Page, PrivateIp, Subnet, Vcn};
pub use walker::{HierarchyWalker, WalkReport};
pub use record::{HostRecord, HostsBuffer};
pub use engine::{HostsEngine, RunSummary};
pub use config::HostsConfig;
pub use error::{Error, Result};
pub use state::{ManagedBlockFile, MemoryHostsSink};
