//! OCI configuration file loading
//!
//! The OCI config file is INI-style:
//!
//! ```text
//! [DEFAULT]
//! user=ocid1.user.oc1..aaaa
//! fingerprint=12:34:...
//! key_file=~/.oci/oci_api_key.pem
//! tenancy=ocid1.tenancy.oc1..aaaa
//! region=eu-frankfurt-1
//!
//! [ADMIN]
//! user=ocid1.user.oc1..bbbb
//! ```
//!
//! A named profile inherits every key it does not set from `DEFAULT`.

use oci_hosts_core::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file used when none is given, or the given one does not exist
pub const DEFAULT_CONFIG_PATH: &str = "~/.oci/config";

/// Profile used when none is given
pub const DEFAULT_PROFILE: &str = "DEFAULT";

const REQUIRED_KEYS: [&str; 5] = ["user", "fingerprint", "key_file", "tenancy", "region"];

/// Parsed OCI config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OciConfig {
    profiles: BTreeMap<String, BTreeMap<String, String>>,
}

/// One resolved profile, with `DEFAULT` values filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    /// Profile name
    pub name: String,
    /// User OCID
    pub user: String,
    /// Fingerprint of the uploaded API public key
    pub fingerprint: String,
    /// Private key path, `~/` expanded
    pub key_file: PathBuf,
    /// Tenancy OCID
    pub tenancy: String,
    /// Region identifier, e.g. `eu-frankfurt-1`
    pub region: String,
}

impl OciProfile {
    /// Key identifier used in the `Authorization` header
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

impl OciConfig {
    /// Parse config file text
    pub fn parse(text: &str) -> Result<Self> {
        let mut profiles: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::config(format!(
                        "OCI config line {}: empty profile name",
                        index + 1
                    )));
                }
                profiles.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::config(format!(
                    "OCI config line {}: expected key=value",
                    index + 1
                )));
            };

            let Some(profile) = current.as_ref() else {
                return Err(Error::config(format!(
                    "OCI config line {}: key '{}' outside of a profile",
                    index + 1,
                    key.trim()
                )));
            };

            profiles
                .entry(profile.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { profiles })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Could not read OCI config {}: {}", path.display(), e))
        })?;
        debug!("Loaded OCI config from {}", path.display());
        Self::parse(&text)
    }

    /// Resolve a profile, inheriting missing keys from `DEFAULT`
    pub fn profile(&self, name: &str) -> Result<OciProfile> {
        let mut values = self.profiles.get(DEFAULT_PROFILE).cloned().unwrap_or_default();

        match self.profiles.get(name) {
            Some(own) => values.extend(own.iter().map(|(k, v)| (k.clone(), v.clone()))),
            None if name == DEFAULT_PROFILE && !values.is_empty() => {}
            None => {
                return Err(Error::config(format!(
                    "Profile '{}' not found in OCI config",
                    name
                )));
            }
        }

        if let Some(missing) = REQUIRED_KEYS.iter().find(|k| {
            values.get(**k).is_none_or(|v| v.is_empty())
        }) {
            return Err(Error::config(format!(
                "Profile '{}' is missing required key '{}'",
                name, missing
            )));
        }

        let take = |key: &str| values.get(key).cloned().unwrap_or_default();

        Ok(OciProfile {
            name: name.to_string(),
            user: take("user"),
            fingerprint: take("fingerprint"),
            key_file: expand_home(&take("key_file"))?,
            tenancy: take("tenancy"),
            region: take("region"),
        })
    }
}

/// Expand a leading `~/` to the current user's home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::config("Could not determine the home directory"))?;
        let rest = path.trim_start_matches('~').trim_start_matches('/');
        return Ok(if rest.is_empty() { home } else { home.join(rest) });
    }
    Ok(PathBuf::from(path))
}

/// Pick the config file to load
///
/// A requested path that does not exist falls back to
/// [`DEFAULT_CONFIG_PATH`] with a warning.
pub fn resolve_config_path(requested: Option<&Path>) -> Result<PathBuf> {
    let default = expand_home(DEFAULT_CONFIG_PATH)?;

    match requested {
        Some(path) if path.exists() => Ok(path.to_path_buf()),
        Some(path) => {
            warn!(
                "OCI config {} does not exist, using {}",
                path.display(),
                default.display()
            );
            Ok(default)
        }
        None => Ok(default),
    }
}
