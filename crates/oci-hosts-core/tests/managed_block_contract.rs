//! Contract Test: Managed Block Idempotency
//!
//! Constraints verified:
//! - Two commits of the same block yield byte-identical files
//! - A file without a sentinel keeps every existing line and gains the block
//! - Content ahead of the sentinel is never altered
//! - Lines that are not valid UTF-8 survive byte-for-byte
//! - A failed commit leaves the target untouched and no temp file behind
//!
//! If this test fails, repeated cron runs corrupt /etc/hosts.

mod common;

use common::APP1_LINE;
use oci_hosts_core::traits::HostsSink;
use oci_hosts_core::{Error, ManagedBlockFile};
use std::fs;
use tempfile::tempdir;

const PRISTINE: &str = "127.0.0.1   localhost localhost.localdomain\n\
                        ::1         localhost6\n\
                        192.168.1.10 nas.home nas\n";

#[tokio::test]
async fn repeated_commits_are_byte_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, PRISTINE).unwrap();

    let hosts = ManagedBlockFile::new(&path);

    hosts.commit(APP1_LINE).await.unwrap();
    let first = fs::read(&path).unwrap();

    let outcome = hosts.commit(APP1_LINE).await.unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert!(outcome.replaced_block);
    assert_eq!(outcome.preserved_lines, 3);
}

#[tokio::test]
async fn first_run_appends_without_touching_existing_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, PRISTINE).unwrap();

    let outcome = ManagedBlockFile::new(&path).commit(APP1_LINE).await.unwrap();
    let content = fs::read_to_string(&path).unwrap();

    assert!(!outcome.replaced_block);
    assert_eq!(
        content,
        format!("{PRISTINE}# oci_hosts text below this will be removed\n{APP1_LINE}")
    );
}

#[tokio::test]
async fn non_utf8_lines_before_sentinel_survive_verbatim() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    let mut original = b"127.0.0.1 localhost # caf\xe9\n".to_vec();
    original.extend_from_slice(PRISTINE.as_bytes());
    fs::write(&path, &original).unwrap();

    let hosts = ManagedBlockFile::new(&path);
    hosts.commit(APP1_LINE).await.unwrap();
    let first = fs::read(&path).unwrap();

    let mut expected = original.clone();
    expected.extend_from_slice(b"# oci_hosts text below this will be removed\n");
    expected.extend_from_slice(APP1_LINE.as_bytes());
    assert_eq!(first, expected);

    let outcome = hosts.commit(APP1_LINE).await.unwrap();
    assert!(outcome.replaced_block);
    assert_eq!(outcome.preserved_lines, 4);
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[tokio::test]
async fn empty_target_gets_marker_and_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, "").unwrap();

    ManagedBlockFile::new(&path).commit(APP1_LINE).await.unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("# oci_hosts text below this will be removed\n{APP1_LINE}")
    );
}

#[tokio::test]
async fn changed_inventory_replaces_only_the_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, PRISTINE).unwrap();
    let hosts = ManagedBlockFile::new(&path);

    hosts
        .commit("10.0.0.9            old.web.prod.oraclevcn.com old.web old\n")
        .await
        .unwrap();
    hosts.commit(APP1_LINE).await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(PRISTINE));
    assert!(!content.contains("old.web"));
    assert_eq!(content.matches("# oci_hosts").count(), 1);
    assert!(content.ends_with(APP1_LINE));
}

#[tokio::test]
async fn empty_block_clears_previous_hosts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");
    fs::write(&path, PRISTINE).unwrap();
    let hosts = ManagedBlockFile::new(&path);

    hosts.commit(APP1_LINE).await.unwrap();
    let outcome = hosts.commit("").await.unwrap();

    assert_eq!(outcome.generated_lines, 0);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{PRISTINE}# oci_hosts text below this will be removed\n")
    );
}

#[tokio::test]
async fn missing_target_is_never_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hosts");

    let result = ManagedBlockFile::new(&path).commit(APP1_LINE).await;

    assert!(matches!(result, Err(Error::TargetFile { .. })));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
