//! Contract Test: End-to-End Run
//!
//! Constraints verified:
//! - The single-host tenancy renders to exactly one expected line
//! - A run with isolated branch failures still commits what it collected
//! - A fatal walk error leaves the target file untouched
//! - Re-running against unchanged inventory converges to the same bytes

mod common;

use common::*;
use oci_hosts_core::traits::{PrivateIp, ResourceKind, Subnet, Vcn};
use oci_hosts_core::{Error, HostsConfig, HostsEngine, ManagedBlockFile, MemoryHostsSink};
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn single_host_tenancy_renders_one_line() {
    let sink = MemoryHostsSink::new();
    let engine = HostsEngine::new(
        Box::new(prod_inventory()),
        Box::new(sink.clone()),
        HostsConfig::new(PROD_COMPARTMENT),
    )
    .expect("engine construction succeeds");

    let summary = engine.run().await.unwrap();

    assert_eq!(summary.lines_written(), 1);
    assert!(summary.walk.is_complete());
    assert_eq!(
        sink.content().await,
        format!("# oci_hosts text below this will be removed\n{APP1_LINE}")
    );
}

#[tokio::test]
async fn run_writes_hosts_file_and_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, "127.0.0.1 localhost\n").unwrap();

    let config = HostsConfig::new(PROD_COMPARTMENT).with_target(&path);
    let engine = HostsEngine::new(
        Box::new(prod_inventory()),
        Box::new(ManagedBlockFile::with_block(&path, config.block.clone())),
        config,
    )
    .unwrap();

    engine.run().await.unwrap();
    let first = fs::read(&path).unwrap();
    engine.run().await.unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(second).unwrap(),
        format!("127.0.0.1 localhost\n# oci_hosts text below this will be removed\n{APP1_LINE}")
    );
}

#[tokio::test]
async fn branch_failure_still_commits_collected_records() {
    let inventory = prod_inventory()
        .with_vcns(
            PROD_COMPARTMENT,
            vec![Vcn::new("ocid1.vcn.oc1..prod", "prod"), Vcn::new("ocid1.vcn.oc1..b", "beta")],
        )
        .with_subnets("ocid1.vcn.oc1..prod", vec![Subnet::new("ocid1.subnet.oc1..web", "web")])
        .with_private_ips(
            "ocid1.subnet.oc1..web",
            vec![PrivateIp::primary("ocid1.privateip.oc1..app1", "10.0.0.5", "app1")],
        )
        .failing(ResourceKind::Subnet, "ocid1.vcn.oc1..b");

    let sink = MemoryHostsSink::new();
    let engine = HostsEngine::new(
        Box::new(inventory),
        Box::new(sink.clone()),
        HostsConfig::new(PROD_COMPARTMENT),
    )
    .unwrap();

    let summary = engine.run().await.unwrap();

    assert_eq!(summary.walk.failures.len(), 1);
    assert_eq!(sink.commit_count(), 1);
    assert!(sink.content().await.ends_with(APP1_LINE));
}

#[tokio::test]
async fn fatal_walk_error_leaves_target_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, "127.0.0.1 localhost\n").unwrap();

    let inventory = prod_inventory().failing(ResourceKind::Compartment, TENANCY);
    let engine = HostsEngine::new(
        Box::new(inventory),
        Box::new(ManagedBlockFile::new(&path)),
        HostsConfig::new(TENANCY).with_target(&path),
    )
    .unwrap();

    let result = engine.run().await;

    assert!(matches!(result, Err(Error::RootCompartments { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), "127.0.0.1 localhost\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn invalid_config_is_rejected_at_construction() {
    let result = HostsEngine::new(
        Box::new(prod_inventory()),
        Box::new(MemoryHostsSink::new()),
        HostsConfig::new(""),
    );

    assert!(matches!(result, Err(Error::Config(_))));
}
