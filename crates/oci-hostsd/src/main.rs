// # oci-hosts - OCI Hosts Builder
//
// This binary is a THIN integration layer:
// - Parse arguments
// - Initialize logging
// - Load the OCI config profile and build the inventory
// - Run the hosts engine once
//
// All traversal and merge logic lives in oci-hosts-core.
//
// ## Usage
//
// ```bash
// # Walk every compartment of the tenancy into /etc/hosts
// oci-hosts ocid1.tenancy.oc1..aaaa
//
// # One compartment into a custom file, with a named profile
// oci-hosts --profile ADMIN ocid1.compartment.oc1..bbbb ./hosts
//
// # Print the generated block instead of writing it
// oci-hosts --dry-run ocid1.compartment.oc1..bbbb
// ```
//
// ## Environment
//
// - `OCI_CONFIG_FILE`: OCI config file (default `~/.oci/config`)
// - `OCI_CLI_PROFILE`: Profile name (default `DEFAULT`)
// - `OCI_HOSTS_DEBUG`: Enable debug logging

use anyhow::{Context, Result};
use clap::Parser;
use oci_hosts_core::config::DEFAULT_TARGET;
use oci_hosts_core::record::DEFAULT_DOMAIN_SUFFIX;
use oci_hosts_core::traits::HostsSink;
use oci_hosts_core::{HostsConfig, HostsEngine, ManagedBlockFile, MemoryHostsSink};
use oci_hosts_provider_oci::config::{DEFAULT_PROFILE, resolve_config_path};
use oci_hosts_provider_oci::{OciConfig, OciInventory};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Hosts file written (or printed)
/// - 1: Configuration error (arguments, OCI config, credentials)
/// - 2: Runtime error (compartment resolution, target file)
#[derive(Debug, Clone, Copy)]
enum HostsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<HostsExitCode> for ExitCode {
    fn from(code: HostsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "oci-hosts")]
#[command(about = "Build a hosts file from the private IPs of an OCI tenancy", long_about = None)]
#[command(version)]
struct Cli {
    /// Compartment OCID to query; the tenancy OCID walks every compartment
    compartment: String,

    /// Hosts file to update
    #[arg(default_value = DEFAULT_TARGET)]
    hosts: PathBuf,

    /// OCI config file; falls back to ~/.oci/config when it does not exist
    #[arg(long, env = "OCI_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Profile in the OCI config file
    #[arg(long, env = "OCI_CLI_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Domain suffix appended to <host>.<subnet>.<vcn>
    #[arg(long, default_value = DEFAULT_DOMAIN_SUFFIX)]
    domain_suffix: String,

    /// Enable debug logging
    #[arg(long, env = "OCI_HOSTS_DEBUG")]
    debug: bool,

    /// Print the generated block to stdout instead of writing the hosts file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                HostsExitCode::ConfigError.into()
            } else {
                HostsExitCode::Success.into()
            };
        }
    };

    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostsExitCode::ConfigError.into();
    }

    let (engine, preview) = match build_engine(&cli) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return HostsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(engine, preview).await {
            Ok(()) => HostsExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                HostsExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build the engine from arguments and the OCI config file
///
/// In dry-run mode the engine commits to an in-memory sink, returned
/// alongside so the block can be printed afterwards.
fn build_engine(cli: &Cli) -> Result<(HostsEngine, Option<MemoryHostsSink>)> {
    let config_path = resolve_config_path(cli.config.as_deref())?;
    let oci_config = OciConfig::load(&config_path)?;
    let profile = oci_config
        .profile(&cli.profile)
        .with_context(|| format!("Using OCI config {}", config_path.display()))?;
    let inventory = OciInventory::from_profile(&profile)?;

    let config = HostsConfig::new(&cli.compartment)
        .with_target(&cli.hosts)
        .with_domain_suffix(&cli.domain_suffix);

    debug!(
        "Root compartment {}, target {}, suffix {}",
        config.root_compartment,
        config.target.display(),
        config.domain_suffix
    );

    let (sink, preview): (Box<dyn HostsSink>, _) = if cli.dry_run {
        let memory = MemoryHostsSink::new().with_block(config.block.clone());
        (Box::new(memory.clone()), Some(memory))
    } else {
        (
            Box::new(ManagedBlockFile::with_block(&config.target, config.block.clone())),
            None,
        )
    };

    let engine = HostsEngine::new(Box::new(inventory), sink, config)?;
    Ok((engine, preview))
}

/// Run the engine once and print the block in dry-run mode
async fn run(engine: HostsEngine, preview: Option<MemoryHostsSink>) -> Result<()> {
    let summary = engine.run().await?;

    if let Some(memory) = preview {
        info!(
            "Dry run: {} was not modified",
            engine.config().target.display()
        );
        print!("{}", memory.content().await);
    }

    if !summary.walk.is_complete() {
        for failure in &summary.walk.failures {
            debug!(
                "Skipped {} under {}: {}",
                failure.level, failure.parent_id, failure.message
            );
        }
    }

    Ok(())
}
