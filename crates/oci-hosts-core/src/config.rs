//! Configuration types for the OCI hosts builder
//!
//! This module defines the run configuration handed to the engine.

use crate::record::DEFAULT_DOMAIN_SUFFIX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hosts file updated when no target is given
pub const DEFAULT_TARGET: &str = "/etc/hosts";

/// Token identifying the start of the managed block
pub const DEFAULT_SENTINEL: &str = "# oci_hosts";

/// Line written at the start of the managed block
pub const DEFAULT_MARKER: &str = "# oci_hosts text below this will be removed";

/// Main run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostsConfig {
    /// Compartment OCID to start from; the tenancy OCID walks every compartment
    pub root_compartment: String,

    /// Hosts file holding the managed block
    #[serde(default = "default_target")]
    pub target: PathBuf,

    /// Domain suffix appended to `<host>.<subnet>.<vcn>`
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,

    /// Managed block settings
    #[serde(default)]
    pub block: BlockConfig,
}

impl HostsConfig {
    /// Create a configuration with defaults for the given root compartment
    pub fn new(root_compartment: impl Into<String>) -> Self {
        Self {
            root_compartment: root_compartment.into(),
            target: default_target(),
            domain_suffix: default_domain_suffix(),
            block: BlockConfig::default(),
        }
    }

    /// Set the target hosts file
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the domain suffix
    pub fn with_domain_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.domain_suffix = suffix.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.root_compartment.trim().is_empty() {
            return Err(crate::Error::config("Root compartment OCID cannot be empty"));
        }

        if self.target.as_os_str().is_empty() {
            return Err(crate::Error::config("Target hosts file path cannot be empty"));
        }

        if self.domain_suffix.is_empty() {
            return Err(crate::Error::config("Domain suffix cannot be empty"));
        }

        self.block.validate()
    }
}

/// Sentinel and marker of the managed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Substring that identifies the first line of the managed block
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    /// Comment line written in place of the sentinel line
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl BlockConfig {
    /// Validate the block settings
    ///
    /// The marker must contain the sentinel, otherwise the next run would not
    /// find the block it wrote and would append a second one.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.sentinel.is_empty() {
            return Err(crate::Error::config("Managed block sentinel cannot be empty"));
        }

        if self.marker.contains('\n') {
            return Err(crate::Error::config("Managed block marker must be a single line"));
        }

        if !self.marker.contains(&self.sentinel) {
            return Err(crate::Error::config(format!(
                "Managed block marker '{}' must contain the sentinel '{}'",
                self.marker, self.sentinel
            )));
        }

        Ok(())
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            marker: default_marker(),
        }
    }
}

fn default_target() -> PathBuf {
    PathBuf::from(DEFAULT_TARGET)
}

fn default_domain_suffix() -> String {
    DEFAULT_DOMAIN_SUFFIX.to_string()
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}
