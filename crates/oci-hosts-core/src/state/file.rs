// # Managed-Block File
//
// File-based implementation of HostsSink.
//
// ## Purpose
//
// Owns the tail of a hosts file. Everything before the first line containing
// the sentinel token belongs to other processes and is copied verbatim; the
// sentinel line is replaced by the marker comment and everything after it by
// the freshly generated block.
//
// ## File Layout
//
// ```text
// 127.0.0.1   localhost
// ::1         localhost
// # oci_hosts text below this will be removed
// 10.0.0.5            app1.web.prod.oraclevcn.com app1.web app1
// ```
//
// ## Atomicity
//
// - The target must already exist (even if empty)
// - The merged content is written to a sibling temporary file, synced and
//   renamed over the target
// - On failure the temporary file is removed and the target is untouched

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::Error;
use crate::config::BlockConfig;
use crate::traits::hosts_sink::{HostsSink, SyncOutcome};

/// Mode the replaced hosts file is given on Unix
pub const HOSTS_FILE_MODE: u32 = 0o644;

/// Suffix of the sibling temporary file
const TEMP_SUFFIX: &str = ".oci-hosts.tmp";

/// Merge a generated block into existing file content
///
/// Lines are copied byte for byte up to the first one containing
/// `block.sentinel`; the marker and `generated` follow. Without a sentinel
/// the marker and block are appended. Preserved lines need not be valid
/// UTF-8; their line endings are normalized to `\n`.
pub fn merge_block(existing: &[u8], generated: &str, block: &BlockConfig) -> (Vec<u8>, SyncOutcome) {
    let mut merged = Vec::with_capacity(existing.len() + block.marker.len() + generated.len() + 2);
    let mut preserved_lines = 0;
    let mut replaced_block = false;

    for line in byte_lines(existing) {
        if contains(line, block.sentinel.as_bytes()) {
            replaced_block = true;
            break;
        }
        merged.extend_from_slice(line);
        merged.push(b'\n');
        preserved_lines += 1;
    }

    merged.extend_from_slice(block.marker.as_bytes());
    merged.push(b'\n');
    merged.extend_from_slice(generated.as_bytes());
    if !generated.is_empty() && !generated.ends_with('\n') {
        merged.push(b'\n');
    }

    let outcome = SyncOutcome {
        replaced_block,
        preserved_lines,
        generated_lines: generated.lines().count(),
    };
    (merged, outcome)
}

/// Lines of `bytes` without their `\n` or `\r\n` terminator
fn byte_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let lines = (!bytes.is_empty()).then(|| body.split(|b| *b == b'\n'));
    lines
        .into_iter()
        .flatten()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

/// Hosts file with a managed block
///
/// # Example
///
/// ```rust,no_run
/// use oci_hosts_core::state::ManagedBlockFile;
/// use oci_hosts_core::traits::HostsSink;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let hosts = ManagedBlockFile::new("/etc/hosts");
///     let outcome = hosts
///         .commit("10.0.0.5            app1.web.prod.oraclevcn.com app1.web app1\n")
///         .await?;
///     assert_eq!(outcome.generated_lines, 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ManagedBlockFile {
    path: PathBuf,
    block: BlockConfig,
}

impl ManagedBlockFile {
    /// Managed block with the default sentinel and marker
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_block(path, BlockConfig::default())
    }

    /// Managed block with a custom sentinel and marker
    pub fn with_block<P: AsRef<Path>>(path: P, block: BlockConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            block,
        }
    }

    /// The target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `generated` into `existing` using this file's block settings
    pub fn render(&self, existing: &[u8], generated: &str) -> (Vec<u8>, SyncOutcome) {
        merge_block(existing, generated, &self.block)
    }

    /// Get path to the sibling temporary file
    ///
    /// Kept in the target's directory so the final rename never crosses
    /// filesystems.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or(OsStr::new("hosts")));
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Replace the target with `content`, removing the temp file on failure
    async fn replace(&self, content: &[u8]) -> Result<(), Error> {
        let temp_path = self.temp_path();

        if let Err(e) = self.write_and_rename(&temp_path, content).await {
            if let Err(remove_err) = fs::remove_file(&temp_path).await
                && remove_err.kind() != std::io::ErrorKind::NotFound
            {
                warn!(
                    "Failed to remove temporary file {}: {}",
                    temp_path.display(),
                    remove_err
                );
            }
            return Err(e);
        }

        Ok(())
    }

    async fn write_and_rename(&self, temp_path: &Path, content: &[u8]) -> Result<(), Error> {
        {
            let mut file = fs::File::create(temp_path).await.map_err(|e| {
                Error::target_file(
                    &self.path,
                    format!("failed to create temp file {}: {}", temp_path.display(), e),
                )
            })?;

            file.write_all(content).await.map_err(|e| {
                Error::target_file(
                    &self.path,
                    format!("failed to write temp file {}: {}", temp_path.display(), e),
                )
            })?;

            file.flush().await.map_err(|e| {
                Error::target_file(
                    &self.path,
                    format!("failed to flush temp file {}: {}", temp_path.display(), e),
                )
            })?;

            file.sync_all().await.map_err(|e| {
                Error::target_file(
                    &self.path,
                    format!("failed to sync temp file {}: {}", temp_path.display(), e),
                )
            })?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(temp_path, std::fs::Permissions::from_mode(HOSTS_FILE_MODE))
                .await
                .map_err(|e| {
                    Error::target_file(&self.path, format!("failed to set permissions: {}", e))
                })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(temp_path, &self.path).await.map_err(|e| {
            Error::target_file(
                &self.path,
                format!("failed to rename {}: {}", temp_path.display(), e),
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl HostsSink for ManagedBlockFile {
    async fn commit(&self, generated: &str) -> Result<SyncOutcome, Error> {
        let existing = fs::read(&self.path)
            .await
            .map_err(|e| Error::target_file(&self.path, format!("failed to read: {}", e)))?;

        let (merged, outcome) = self.render(&existing, generated);
        self.replace(&merged).await?;

        debug!(
            "Committed managed block to {} ({} preserved, {} generated, sentinel found: {})",
            self.path.display(),
            outcome.preserved_lines,
            outcome.generated_lines,
            outcome.replaced_block
        );
        Ok(outcome)
    }

    fn sink_name(&self) -> String {
        self.path.display().to_string()
    }
}
