//! Host records and their hosts-file rendering

use crate::traits::PrivateIp;
use std::fmt;

/// Domain suffix OCI appends to `<host>.<subnet>.<vcn>`
pub const DEFAULT_DOMAIN_SUFFIX: &str = "oraclevcn.com";

/// Column the first hostname starts at
pub const IP_COLUMN_WIDTH: usize = 20;

/// One hosts-file entry derived from a primary private IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    /// The IP literal
    pub ip: String,
    /// `<host>.<subnet>.<vcn>.<suffix>`
    pub fqdn: String,
    /// `<host>.<subnet>`
    pub subnet_alias: String,
    /// `<host>`
    pub short_name: String,
}

impl HostRecord {
    /// Build a record from a private IP and its owning subnet and VCN labels
    ///
    /// Returns `None` unless the address is primary and carries both an IP
    /// literal and a hostname label. No label validation is performed.
    pub fn from_private_ip(
        private_ip: &PrivateIp,
        subnet_label: &str,
        vcn_label: &str,
        domain_suffix: &str,
    ) -> Option<Self> {
        if !private_ip.is_primary {
            return None;
        }
        let ip = private_ip.ip_address.as_deref()?;
        let host = private_ip.hostname_label.as_deref()?;

        Some(Self {
            ip: ip.to_string(),
            fqdn: format!("{host}.{subnet_label}.{vcn_label}.{domain_suffix}"),
            subnet_alias: format!("{host}.{subnet_label}"),
            short_name: host.to_string(),
        })
    }

    /// Render the record as one `\n`-terminated hosts line
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for HostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Long IPv6 literals overflow the column; keep at least one separator.
        let sep = if self.ip.len() >= IP_COLUMN_WIDTH { " " } else { "" };
        write!(
            f,
            "{:<width$}{sep}{} {} {}",
            self.ip,
            self.fqdn,
            self.subnet_alias,
            self.short_name,
            width = IP_COLUMN_WIDTH
        )
    }
}

/// In-memory buffer of rendered hosts lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsBuffer {
    content: String,
    lines: usize,
}

impl HostsBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record
    pub fn push(&mut self, record: &HostRecord) {
        self.content.push_str(&record.to_line());
        self.lines += 1;
    }

    /// Number of records appended
    pub fn len(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl Extend<HostRecord> for HostsBuffer {
    fn extend<I: IntoIterator<Item = HostRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(&record);
        }
    }
}
