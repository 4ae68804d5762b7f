//! Core traits for the OCI hosts builder
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`NetworkInventory`]: List compartments, VCNs, subnets and private IPs
//! - [`HostsSink`]: Commit a generated hosts block

pub mod inventory;
pub mod hosts_sink;

pub use inventory::{
    Compartment, NetworkInventory, Page, PrivateIp, ResourceKind, Subnet, Vcn,
};
pub use hosts_sink::{HostsSink, SyncOutcome};
