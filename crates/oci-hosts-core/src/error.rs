//! Error types for the OCI hosts builder
//!
//! This module defines all error types used throughout the crate.

use crate::traits::inventory::ResourceKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for hosts builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the OCI hosts builder
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential loading or request signing errors
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The initial compartment set could not be resolved
    #[error("Could not retrieve compartments under {root}: {message}")]
    RootCompartments {
        /// The root identifier given on input
        root: String,
        /// Underlying failure
        message: String,
    },

    /// A listing call for one node of the hierarchy failed
    #[error("Could not list {level} under {parent}: {message}")]
    Listing {
        /// Which kind of resource was being listed
        level: ResourceKind,
        /// The parent the listing was scoped to
        parent: String,
        /// Underlying failure
        message: String,
    },

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The target hosts file could not be read or replaced
    #[error("Target file {}: {message}", path.display())]
    TargetFile {
        /// Target file path
        path: PathBuf,
        /// Underlying failure
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a credentials error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a root compartment resolution error
    pub fn root_compartments(root: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RootCompartments {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a branch listing error
    pub fn listing(level: ResourceKind, parent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listing {
            level,
            parent: parent.into(),
            message: message.into(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a target file error
    pub fn target_file(path: &Path, message: impl std::fmt::Display) -> Self {
        Self::TargetFile {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Whether this error aborts the whole run
    ///
    /// Branch listing failures are the only recoverable category; the walker
    /// logs them and moves on to sibling branches.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Listing { .. })
    }
}
