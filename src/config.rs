//! Server configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a Ming server instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path where the server stores its data
    pub storage_path: PathBuf,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Policy applied when no permission record covers an operation
    #[serde(default)]
    pub default_access: DefaultAccess,
}

/// Access granted to a resource when neither its own permission record nor an
/// inherited one says anything about the requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultAccess {
    /// Any authenticated user may perform any operation; anonymous is denied.
    #[default]
    Authenticated,
    /// Reads are public; every other operation requires an identity.
    PublicRead,
    /// Everything is denied unless a permission record grants it.
    Deny,
}

fn default_bind_address() -> String {
    "127.0.0.1:27080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("data"),
            bind_address: default_bind_address(),
            default_access: DefaultAccess::default(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration with the specified storage path.
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            ..Default::default()
        }
    }

    /// Set the address the HTTP server binds to.
    pub fn with_bind_address(mut self, address: &str) -> Self {
        self.bind_address = address.to_string();
        self
    }

    /// Set the default-access policy.
    pub fn with_default_access(mut self, access: DefaultAccess) -> Self {
        self.default_access = access;
        self
    }
}
