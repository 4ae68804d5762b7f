//! Test doubles and common utilities for contract tests
//!
//! This module provides a scripted in-memory inventory that pages its
//! results, injects listing failures, and records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use oci_hosts_core::error::{Error, Result};
use oci_hosts_core::traits::{
    Compartment, NetworkInventory, Page, PrivateIp, ResourceKind, Subnet, Vcn,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const TENANCY: &str = "ocid1.tenancy.oc1..tenancy";
pub const PROD_COMPARTMENT: &str = "ocid1.compartment.oc1..prod";

/// One recorded listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: ResourceKind,
    /// Parent the call was scoped to (`<compartment>/<vcn>` for subnets)
    pub parent: String,
    pub page: Option<String>,
    pub subtree: bool,
}

/// An inventory scripted per parent id
///
/// Listings are split into pages of `page_size` items with cursors of the form
/// `offset-<n>`. Parents registered with [`ScriptedInventory::failing`] return
/// an HTTP error for every call.
#[derive(Debug, Clone)]
pub struct ScriptedInventory {
    children: HashMap<String, Vec<Compartment>>,
    subtrees: HashMap<String, Vec<Compartment>>,
    vcns: HashMap<String, Vec<Vcn>>,
    subnets: HashMap<String, Vec<Subnet>>,
    private_ips: HashMap<String, Vec<PrivateIp>>,
    failures: HashSet<(ResourceKind, String)>,
    page_size: usize,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedInventory {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            subtrees: HashMap::new(),
            vcns: HashMap::new(),
            subnets: HashMap::new(),
            private_ips: HashMap::new(),
            failures: HashSet::new(),
            page_size: 100,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Direct child compartments of `parent`
    pub fn with_children(mut self, parent: &str, compartments: &[&str]) -> Self {
        self.children.insert(
            parent.to_string(),
            compartments.iter().map(|id| Compartment::new(*id)).collect(),
        );
        self
    }

    /// Every compartment in the subtree of `parent`
    pub fn with_subtree(mut self, parent: &str, compartments: &[&str]) -> Self {
        self.subtrees.insert(
            parent.to_string(),
            compartments.iter().map(|id| Compartment::new(*id)).collect(),
        );
        self
    }

    pub fn with_vcns(mut self, compartment: &str, vcns: Vec<Vcn>) -> Self {
        self.vcns.insert(compartment.to_string(), vcns);
        self
    }

    pub fn with_subnets(mut self, vcn: &str, subnets: Vec<Subnet>) -> Self {
        self.subnets.insert(vcn.to_string(), subnets);
        self
    }

    pub fn with_private_ips(mut self, subnet: &str, private_ips: Vec<PrivateIp>) -> Self {
        self.private_ips.insert(subnet.to_string(), private_ips);
        self
    }

    /// Make every listing of `kind` under `parent` fail
    pub fn failing(mut self, kind: ResourceKind, parent: &str) -> Self {
        self.failures.insert((kind, parent.to_string()));
        self
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls of one kind
    pub fn calls_of(&self, kind: ResourceKind) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }

    fn record(&self, kind: ResourceKind, parent: &str, page: Option<&str>, subtree: bool) {
        self.calls.lock().unwrap().push(Call {
            kind,
            parent: parent.to_string(),
            page: page.map(str::to_string),
            subtree,
        });
    }

    fn page_of<T: Clone>(
        &self,
        kind: ResourceKind,
        parent: &str,
        items: Option<&Vec<T>>,
        page: Option<&str>,
    ) -> Result<Page<T>> {
        if self.failures.contains(&(kind, parent.to_string())) {
            return Err(Error::http(format!("injected failure listing {kind} of {parent}")));
        }

        let items = items.map(Vec::as_slice).unwrap_or(&[]);
        let start = match page {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("offset-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| Error::http(format!("bad cursor {cursor}")))?,
        };
        let end = (start + self.page_size).min(items.len());
        let chunk = items[start.min(end)..end].to_vec();

        if end < items.len() {
            Ok(Page::with_next(chunk, format!("offset-{end}")))
        } else {
            Ok(Page::last(chunk))
        }
    }
}

#[async_trait]
impl NetworkInventory for ScriptedInventory {
    async fn list_compartments(
        &self,
        parent: &str,
        subtree: bool,
        page: Option<&str>,
    ) -> Result<Page<Compartment>> {
        self.record(ResourceKind::Compartment, parent, page, subtree);
        let source = if subtree { &self.subtrees } else { &self.children };
        self.page_of(ResourceKind::Compartment, parent, source.get(parent), page)
    }

    async fn list_vcns(&self, compartment_id: &str, page: Option<&str>) -> Result<Page<Vcn>> {
        self.record(ResourceKind::Vcn, compartment_id, page, false);
        self.page_of(ResourceKind::Vcn, compartment_id, self.vcns.get(compartment_id), page)
    }

    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        page: Option<&str>,
    ) -> Result<Page<Subnet>> {
        self.record(
            ResourceKind::Subnet,
            &format!("{compartment_id}/{vcn_id}"),
            page,
            false,
        );
        self.page_of(ResourceKind::Subnet, vcn_id, self.subnets.get(vcn_id), page)
    }

    async fn list_private_ips(&self, subnet_id: &str, page: Option<&str>) -> Result<Page<PrivateIp>> {
        self.record(ResourceKind::PrivateIp, subnet_id, page, false);
        self.page_of(
            ResourceKind::PrivateIp,
            subnet_id,
            self.private_ips.get(subnet_id),
            page,
        )
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// The single-host tenancy: one VCN `prod`, one subnet `web`, one host `app1`
pub fn prod_inventory() -> ScriptedInventory {
    ScriptedInventory::new()
        .with_children(PROD_COMPARTMENT, &[])
        .with_vcns(PROD_COMPARTMENT, vec![Vcn::new("ocid1.vcn.oc1..prod", "prod")])
        .with_subnets("ocid1.vcn.oc1..prod", vec![Subnet::new("ocid1.subnet.oc1..web", "web")])
        .with_private_ips(
            "ocid1.subnet.oc1..web",
            vec![PrivateIp::primary("ocid1.privateip.oc1..app1", "10.0.0.5", "app1")],
        )
}

/// The line the single-host tenancy renders to
pub const APP1_LINE: &str = "10.0.0.5            app1.web.prod.oraclevcn.com app1.web app1\n";
