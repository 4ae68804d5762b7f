// # Network Inventory Trait
//
// Defines the interface for listing the four resource kinds the walker
// traverses: compartments, VCNs, subnets and private IPs.
//
// ## Implementations
//
// - OCI REST APIs: `oci-hosts-provider-oci` crate
// - Scripted in-memory inventory: `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use oci_hosts_core::NetworkInventory;
//
// #[tokio::main]
// async fn main() -> Result<(), Box<dyn std::error::Error>> {
//     let inventory = /* NetworkInventory implementation */;
//
//     // First page of VCNs in a compartment
//     let page = inventory.list_vcns("ocid1.compartment.oc1..aaaa", None).await?;
//     for vcn in &page.items {
//         println!("{} ({:?})", vcn.id, vcn.dns_label);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Opaque cursor for the next page, if the provider reported one
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    /// A page that is followed by another one
    pub fn with_next(items: Vec<T>, next_page: impl Into<String>) -> Self {
        Self {
            items,
            next_page: Some(next_page.into()),
        }
    }

    /// The final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    /// The cursor to continue with, treating an empty string as absent
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// The kind of resource being listed, used for log and error context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Compartment,
    Vcn,
    Subnet,
    PrivateIp,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Compartment => "compartments",
            ResourceKind::Vcn => "VCNs",
            ResourceKind::Subnet => "subnets",
            ResourceKind::PrivateIp => "private IPs",
        };
        f.write_str(name)
    }
}

/// A compartment, the grouping boundary that contains VCNs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    /// Compartment OCID
    pub id: String,
    /// Human-readable name, when the provider supplies one
    #[serde(default)]
    pub name: Option<String>,
}

impl Compartment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// A virtual cloud network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vcn {
    /// VCN OCID
    pub id: String,
    /// DNS label, absent when the VCN was created without DNS resolution
    #[serde(default)]
    pub dns_label: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Vcn {
    pub fn new(id: impl Into<String>, dns_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dns_label: Some(dns_label.into()),
            display_name: None,
        }
    }
}

/// A subnet within a VCN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    /// Subnet OCID
    pub id: String,
    /// DNS label, absent when the subnet was created without DNS resolution
    #[serde(default)]
    pub dns_label: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Subnet {
    pub fn new(id: impl Into<String>, dns_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dns_label: Some(dns_label.into()),
            display_name: None,
        }
    }
}

/// A private IP attached to a VNIC in a subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateIp {
    /// Private IP OCID
    pub id: String,
    /// The IP literal
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Hostname label, absent when no hostname was assigned
    #[serde(default)]
    pub hostname_label: Option<String>,
    /// Whether this is the primary IP of its VNIC
    #[serde(default)]
    pub is_primary: bool,
}

impl PrivateIp {
    /// A primary private IP with both an address and a hostname label
    pub fn primary(id: impl Into<String>, ip: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ip_address: Some(ip.into()),
            hostname_label: Some(hostname.into()),
            is_primary: true,
        }
    }
}

/// Trait for network inventory implementations
///
/// Each method performs exactly one listing call for one page. Pagination,
/// traversal and failure isolation are owned by the walker.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - Perform HTTP/HTTPS API calls to the provider's endpoints
/// - Parse provider-specific responses
/// - Return success or failure
///
/// ## Forbidden Capabilities
/// - Retry or back off (a failed call is the final outcome)
/// - Follow page cursors on its own (owned by [`crate::pager`])
/// - Cache results across calls
#[async_trait]
pub trait NetworkInventory: Send + Sync {
    /// List compartments under `parent`
    ///
    /// # Parameters
    ///
    /// - `parent`: Compartment or tenancy OCID
    /// - `subtree`: `true` to list the entire subtree below `parent`
    /// - `page`: Cursor from the previous page, `None` for the first page
    async fn list_compartments(
        &self,
        parent: &str,
        subtree: bool,
        page: Option<&str>,
    ) -> Result<Page<Compartment>, crate::Error>;

    /// List the VCNs in a compartment
    async fn list_vcns(
        &self,
        compartment_id: &str,
        page: Option<&str>,
    ) -> Result<Page<Vcn>, crate::Error>;

    /// List the subnets of a VCN
    ///
    /// The listing is scoped by both the compartment and the VCN.
    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        page: Option<&str>,
    ) -> Result<Page<Subnet>, crate::Error>;

    /// List the private IPs in a subnet
    async fn list_private_ips(
        &self,
        subnet_id: &str,
        page: Option<&str>,
    ) -> Result<Page<PrivateIp>, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
