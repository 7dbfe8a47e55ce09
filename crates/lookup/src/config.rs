//! Lookup configuration via `kiln.toml`
//!
//! Selects the deployment topology and the name the lookup is registered
//! under. The topology is fixed when the execution context is set up; it is
//! never chosen per call.

use kiln_core::{KilnError, KilnResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::registry::COMPILATION_CACHE_LOOKUP;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Default cap on a decoded remote lookup response (256 MiB)
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 256 * 1024 * 1024;

/// Where the cache lives relative to the execution operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Same process and address space
    Local,
    /// Another process, reached through a transport
    Remote,
}

impl FromStr for Topology {
    type Err = KilnError;

    fn from_str(s: &str) -> KilnResult<Self> {
        match s {
            "local" => Ok(Topology::Local),
            "remote" => Ok(Topology::Remote),
            other => Err(KilnError::invalid_input(format!(
                "Invalid topology '{}' in {}. Expected \"local\" or \"remote\".",
                other, CONFIG_FILE_NAME
            ))),
        }
    }
}

/// Limits for `RemoteLookup`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Largest encoded response accepted from the peer
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Lookup configuration loaded from `kiln.toml`.
///
/// # Example
///
/// ```toml
/// topology = "local"
/// resource_name = "compilation_cache_lookup"
///
/// [remote]
/// max_response_bytes = 268435456
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupConfig {
    /// `"local"` or `"remote"`
    #[serde(default = "default_topology_str")]
    pub topology: String,
    /// Name the lookup is registered under
    #[serde(default = "default_resource_name")]
    pub resource_name: String,
    /// Remote lookup limits
    #[serde(default)]
    pub remote: RemoteConfig,
}

fn default_topology_str() -> String {
    "local".to_string()
}

fn default_resource_name() -> String {
    COMPILATION_CACHE_LOOKUP.to_string()
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            topology: default_topology_str(),
            resource_name: default_resource_name(),
            remote: RemoteConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Parse the topology string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"local"` or `"remote"`.
    pub fn topology(&self) -> KilnResult<Topology> {
        self.topology.parse()
    }

    /// Check every field
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` describing the first bad field.
    pub fn validate(&self) -> KilnResult<()> {
        self.topology()?;
        if self.resource_name.is_empty() {
            return Err(KilnError::invalid_input("resource_name must not be empty"));
        }
        if self.remote.max_response_bytes == 0 {
            return Err(KilnError::invalid_input(
                "remote.max_response_bytes must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Kiln lookup configuration
#
# Where the compiled-program cache lives:
#   "local"  = same process, lookups share the cached program directly
#   "remote" = another process, lookups go through a transport
topology = "local"

# Name the lookup is registered under in the runtime's registry.
resource_name = "compilation_cache_lookup"

[remote]
# Largest encoded lookup response accepted from the peer (bytes).
max_response_bytes = 268435456
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a field is invalid.
    pub fn from_toml_str(content: &str) -> KilnResult<Self> {
        let config: LookupConfig = toml::from_str(content).map_err(|e| {
            KilnError::invalid_input(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> KilnResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
