//! Hierarchy walker
//!
//! The walker materializes the tenancy one level at a time and hands every
//! qualifying private IP to a visitor as a [`HostRecord`]:
//!
//! ```text
//! root OCID
//!   └─ compartments   (subtree listing for the tenancy, direct children otherwise)
//!        └─ VCNs
//!             └─ subnets
//!                  └─ private IPs ── primary + IP + hostname ──▶ HostRecord
//! ```
//!
//! ## Failure Isolation
//!
//! Resolving the initial compartment set is all-or-nothing: its failure is
//! returned as [`Error::RootCompartments`]. Below that, a failed listing of
//! VCNs, subnets or private IPs abandons only that branch. The failure is
//! logged, recorded in the [`WalkReport`], and the walk continues with the
//! next sibling.
//!
//! ## Ordering
//!
//! The walk is strictly sequential and records are produced in provider
//! listing order, which is not stable across runs.

use crate::error::{Error, Result};
use crate::pager::{Pager, collect_all};
use crate::record::HostRecord;
use crate::traits::{Compartment, NetworkInventory, Page, ResourceKind, Subnet, Vcn};
use std::future::Future;
use tracing::{debug, error, trace};

/// Whether an OCID names the tenancy root
///
/// Tenancy OCIDs have the form `ocid1.tenancy.<realm>..<id>`.
pub fn is_tenancy(id: &str) -> bool {
    id.contains("tenancy")
}

/// A listing failure that was isolated to one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    /// What was being listed
    pub level: ResourceKind,
    /// The compartment, VCN or subnet the listing was scoped to
    pub parent_id: String,
    /// Rendered error
    pub message: String,
}

/// Counters and isolated failures for one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub compartments: usize,
    pub vcns: usize,
    pub subnets: usize,
    pub private_ips: usize,
    /// Host records handed to the visitor
    pub records: usize,
    /// Branches abandoned after a listing failure
    pub failures: Vec<BranchFailure>,
}

impl WalkReport {
    /// Whether every branch was listed successfully
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Walks compartments → VCNs → subnets → private IPs
pub struct HierarchyWalker<'a> {
    inventory: &'a dyn NetworkInventory,
    domain_suffix: String,
}

impl<'a> HierarchyWalker<'a> {
    /// Create a walker over an inventory
    ///
    /// # Parameters
    ///
    /// - `inventory`: Listing capability for the four resource kinds
    /// - `domain_suffix`: Suffix of generated FQDNs (e.g., "oraclevcn.com")
    pub fn new(inventory: &'a dyn NetworkInventory, domain_suffix: impl Into<String>) -> Self {
        Self {
            inventory,
            domain_suffix: domain_suffix.into(),
        }
    }

    /// Walk the hierarchy below `root_id`, handing each record to `visitor`
    ///
    /// # Returns
    ///
    /// - `Ok(WalkReport)`: The walk finished; some branches may have failed
    /// - `Err(Error::RootCompartments)`: The compartment set could not be resolved
    pub async fn walk<V>(&self, root_id: &str, mut visitor: V) -> Result<WalkReport>
    where
        V: FnMut(HostRecord),
    {
        let compartments = self.resolve_compartments(root_id).await?;

        let mut report = WalkReport::default();
        for compartment in &compartments {
            report.compartments += 1;
            self.walk_compartment(compartment, &mut report, &mut visitor)
                .await;
        }

        Ok(report)
    }

    /// Walk the hierarchy and collect every record
    pub async fn collect(&self, root_id: &str) -> Result<(Vec<HostRecord>, WalkReport)> {
        let mut records = Vec::new();
        let report = self.walk(root_id, |record| records.push(record)).await?;
        Ok((records, report))
    }

    /// Resolve the compartments to traverse
    ///
    /// The tenancy root lists its whole subtree; any other compartment lists
    /// its direct children. An empty listing means the input compartment is
    /// itself the only one to scan.
    pub async fn resolve_compartments(&self, root_id: &str) -> Result<Vec<Compartment>> {
        let inventory = self.inventory;
        let subtree = is_tenancy(root_id);

        let compartments = collect_all(move |cursor: Option<String>| async move {
            inventory
                .list_compartments(root_id, subtree, cursor.as_deref())
                .await
        })
        .await
        .map_err(|e| Error::root_compartments(root_id, e.to_string()))?;

        if compartments.is_empty() {
            debug!("No child compartments under {}, scanning it directly", root_id);
            return Ok(vec![Compartment::new(root_id)]);
        }

        debug!(
            "Resolved {} compartment(s) under {} (subtree: {})",
            compartments.len(),
            root_id,
            subtree
        );
        Ok(compartments)
    }

    async fn walk_compartment<V>(
        &self,
        compartment: &Compartment,
        report: &mut WalkReport,
        visitor: &mut V,
    ) where
        V: FnMut(HostRecord),
    {
        debug!(
            "Processing compartment {} ({})",
            compartment.name.as_deref().unwrap_or("-"),
            compartment.id
        );

        let inventory = self.inventory;
        let compartment_id = compartment.id.as_str();
        let mut pager = Pager::new(move |cursor: Option<String>| async move {
            inventory.list_vcns(compartment_id, cursor.as_deref()).await
        });

        while let Some(vcns) = next_batch(&mut pager, report, ResourceKind::Vcn, compartment_id).await
        {
            for vcn in &vcns {
                report.vcns += 1;
                self.walk_vcn(compartment_id, vcn, report, visitor).await;
            }
        }
    }

    async fn walk_vcn<V>(
        &self,
        compartment_id: &str,
        vcn: &Vcn,
        report: &mut WalkReport,
        visitor: &mut V,
    ) where
        V: FnMut(HostRecord),
    {
        let Some(vcn_label) = vcn.dns_label.as_deref() else {
            debug!("VCN {} has no DNS label, skipping", vcn.id);
            return;
        };
        debug!("Processing VCN {} ({})", vcn_label, vcn.id);

        let inventory = self.inventory;
        let vcn_id = vcn.id.as_str();
        let mut pager = Pager::new(move |cursor: Option<String>| async move {
            inventory
                .list_subnets(compartment_id, vcn_id, cursor.as_deref())
                .await
        });

        while let Some(subnets) = next_batch(&mut pager, report, ResourceKind::Subnet, vcn_id).await {
            for subnet in &subnets {
                report.subnets += 1;
                self.walk_subnet(vcn_label, subnet, report, visitor).await;
            }
        }
    }

    async fn walk_subnet<V>(
        &self,
        vcn_label: &str,
        subnet: &Subnet,
        report: &mut WalkReport,
        visitor: &mut V,
    ) where
        V: FnMut(HostRecord),
    {
        let Some(subnet_label) = subnet.dns_label.as_deref() else {
            debug!("Subnet {} has no DNS label, skipping", subnet.id);
            return;
        };
        debug!("Processing Subnet {} ({})", subnet_label, subnet.id);

        let inventory = self.inventory;
        let subnet_id = subnet.id.as_str();
        let mut pager = Pager::new(move |cursor: Option<String>| async move {
            inventory.list_private_ips(subnet_id, cursor.as_deref()).await
        });

        while let Some(private_ips) =
            next_batch(&mut pager, report, ResourceKind::PrivateIp, subnet_id).await
        {
            for private_ip in &private_ips {
                report.private_ips += 1;
                debug!(
                    "Processing Private IP {}",
                    private_ip.ip_address.as_deref().unwrap_or(&private_ip.id)
                );

                match HostRecord::from_private_ip(
                    private_ip,
                    subnet_label,
                    vcn_label,
                    &self.domain_suffix,
                ) {
                    Some(record) => {
                        report.records += 1;
                        visitor(record);
                    }
                    None => trace!("Private IP {} does not qualify, skipping", private_ip.id),
                }
            }
        }
    }
}

/// Next page of a branch listing, recording a failure instead of returning it
async fn next_batch<T, F, Fut>(
    pager: &mut Pager<F>,
    report: &mut WalkReport,
    level: ResourceKind,
    parent_id: &str,
) -> Option<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    match pager.next_page().await {
        Ok(batch) => batch,
        Err(e) => {
            let err = Error::listing(level, parent_id, e.to_string());
            error!("{}", err);
            report.failures.push(BranchFailure {
                level,
                parent_id: parent_id.to_string(),
                message: e.to_string(),
            });
            None
        }
    }
}
